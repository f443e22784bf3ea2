// Per-match state and timing knobs for the orchestrator

use std::collections::HashSet;
use std::time::Duration;

use crate::game::PlayerState;

/// State owned by one match. Reset whenever a cycle starts at the client handler, so nothing
/// leaks from one match into the next.
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
  /// Set once the ban is confirmed or nothing on the ban list is bannable.
  pub has_acted_on_ban_round: bool,
  /// Set while champion select is being handled. Still set after a failed cycle, so the next
  /// cycle resumes this match instead of starting over.
  pub in_champion_select: bool,
  /// Action ids whose commit was confirmed this match.
  pub confirmed_actions: HashSet<i64>,
  pub player: PlayerState,
}

#[derive(Debug, Clone)]
pub struct BotSettings {
  pub gameplay_tick: Duration,
  /// Wait before starting a new match cycle after one failed.
  pub error_backoff: Duration,
}

impl Default for BotSettings {
  fn default() -> Self {
    Self {
      gameplay_tick: Duration::from_secs(5),
      error_backoff: Duration::from_secs(5),
    }
  }
}
