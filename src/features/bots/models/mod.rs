mod bot;

pub use bot::{BotRecord, NewBot};
