// League Client API access: transport, retries, typed operations and turn resolution

pub mod client;
pub mod request;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use client::{ClientSettings, CommitStatus, CommitStep, GameClient};
pub use request::{HttpTransport, LcuResponse, ResilientClient, RetryPolicy, Transport};
pub use session::{find_actionable_cell, resolve_turn, select_candidate, TurnOutcome};
pub use types::*;
