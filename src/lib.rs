// Library root: League Client automation from lobby to end of game

pub mod bot;
pub mod config;
pub mod error;
pub mod game;
pub mod lcu;
pub mod logging;
pub mod util;

pub use bot::{Bot, BotStrategy};
pub use config::BotConfig;
pub use error::{BotError, ConfigError, LcuError};
