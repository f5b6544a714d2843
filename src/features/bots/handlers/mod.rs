mod bot_handler;

pub use bot_handler::*;
