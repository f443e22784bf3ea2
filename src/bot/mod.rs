// Match orchestration: strategies, per-match context and the phase loop

pub mod strategy;
pub mod types;
pub mod watcher;

#[cfg(test)]
mod tests;

pub use strategy::{BotStrategy, PRESETS};
pub use types::{BotSettings, MatchContext};
pub use watcher::Bot;
