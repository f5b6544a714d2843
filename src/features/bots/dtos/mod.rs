mod bot_dto;

pub use bot_dto::*;
