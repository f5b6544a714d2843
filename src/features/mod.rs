pub mod bots;
pub mod files;
