// In-game side of the bot: live client data, player state and the input/process seams

pub mod input;
pub mod live_client;
pub mod player;
pub mod process;
pub mod steps;

#[cfg(test)]
pub(crate) mod tests;

pub use input::{InputDevice, MouseButton, TracingInputDevice, WindowRatio};
pub use live_client::{LiveClient, Team};
pub use player::{GameplaySettings, PlayerChampion, PlayerState};
pub use process::{ProcessControl, SystemProcesses, GAME_PROCESS};
pub use steps::{GameplayStep, ShopItem};
