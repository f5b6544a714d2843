mod file_service;

pub use file_service::{too_large, FileService};
