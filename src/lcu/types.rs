// Types and constants for the League Client API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level gameflow phase reported by `/lol-gameflow/v1/gameflow-phase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
  None,
  Lobby,
  Matchmaking,
  ReadyCheck,
  ChampSelect,
  InProgress,
  EndOfGame,
  Reconnect,
  /// GameStart, WaitingForStats, PreEndOfGame and anything newer.
  #[serde(other)]
  Unknown,
}

impl Phase {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::None => "None",
      Self::Lobby => "Lobby",
      Self::Matchmaking => "Matchmaking",
      Self::ReadyCheck => "ReadyCheck",
      Self::ChampSelect => "ChampSelect",
      Self::InProgress => "InProgress",
      Self::EndOfGame => "EndOfGame",
      Self::Reconnect => "Reconnect",
      Self::Unknown => "Unknown",
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerPhase {
  BanPick,
  Finalization,
  /// PLANNING, GAME_STARTING, ...
  #[serde(other)]
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
  Ban,
  Pick,
  /// e.g. ten_bans_reveal
  #[serde(other)]
  Other,
}

impl fmt::Display for ActionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Ban => f.write_str("ban"),
      Self::Pick => f.write_str("pick"),
      Self::Other => f.write_str("other"),
    }
  }
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChampionId(pub i64);

impl ChampionId {
  pub const NONE: ChampionId = ChampionId(0);
  pub const NUNU: ChampionId = ChampionId(20);
  pub const LUX: ChampionId = ChampionId(99);
  pub const DRAVEN: ChampionId = ChampionId(119);
  pub const YUUMI: ChampionId = ChampionId(350);
  pub const SETT: ChampionId = ChampionId(875);

  pub fn name(&self) -> Option<&'static str> {
    match *self {
      Self::NUNU => Some("Nunu"),
      Self::LUX => Some("Lux"),
      Self::DRAVEN => Some("Draven"),
      Self::YUUMI => Some("Yuumi"),
      Self::SETT => Some("Sett"),
      _ => None,
    }
  }
}

impl fmt::Display for ChampionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.name() {
      Some(name) => write!(f, "{} ({})", name, self.0),
      None => write!(f, "champion {}", self.0),
    }
  }
}

/// One turn slot in champion select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCell {
  pub id: i64,
  pub actor_cell_id: i64,
  #[serde(rename = "type")]
  pub kind: ActionKind,
  #[serde(default)]
  pub completed: bool,
  /// Champion currently staged on the cell, `0` when nothing is hovered yet.
  #[serde(default)]
  pub champion_id: ChampionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampSelectTimer {
  pub phase: TimerPhase,
}

/// Snapshot of `/lol-champ-select/v1/session`. Never mutated locally, only re-fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampSelectSession {
  pub local_player_cell_id: i64,
  pub timer: ChampSelectTimer,
  #[serde(default)]
  pub actions: Vec<Vec<ActionCell>>,
}

impl ChampSelectSession {
  pub fn find_action(&self, action_id: i64) -> Option<&ActionCell> {
    self.actions.iter().flatten().find(|cell| cell.id == action_id)
  }
}

/// Availability list used to test a candidate before acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
  Pickable,
  Bannable,
}

impl Availability {
  pub fn path(&self) -> &'static str {
    match self {
      Self::Pickable => "/lol-champ-select/v1/pickable-champion-ids",
      Self::Bannable => "/lol-champ-select/v1/bannable-champion-ids",
    }
  }
}

impl From<ActionKind> for Availability {
  fn from(kind: ActionKind) -> Self {
    match kind {
      ActionKind::Ban => Self::Bannable,
      _ => Self::Pickable,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LobbyType {
  Intro,
  Beginner,
  Intermediate,
  QuickPlay,
  DraftPick,
  SoloDuo,
  Flex,
}

impl LobbyType {
  pub fn queue_id(&self) -> u32 {
    match self {
      Self::Intro => 830,
      Self::Beginner => 840,
      Self::Intermediate => 850,
      Self::QuickPlay => 490,
      Self::DraftPick => 400,
      Self::SoloDuo => 420,
      Self::Flex => 440,
    }
  }
}

/// Lane preference, serialized with the client's wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
  #[serde(rename = "UNSELECTED")]
  Unselected,
  #[serde(rename = "BOTTOM")]
  Bottom,
  #[serde(rename = "UTILITY")]
  Support,
  #[serde(rename = "MIDDLE")]
  Middle,
  #[serde(rename = "JUNGLE")]
  Jungle,
  #[serde(rename = "TOP")]
  Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummonerSpell {
  Cleanse,
  Exhaust,
  Flash,
  Ghost,
  Heal,
  Teleport,
  Ignite,
  Barrier,
}

impl SummonerSpell {
  pub fn id(&self) -> u32 {
    match self {
      Self::Cleanse => 1,
      Self::Exhaust => 3,
      Self::Flash => 4,
      Self::Ghost => 6,
      Self::Heal => 7,
      Self::Teleport => 12,
      Self::Ignite => 14,
      Self::Barrier => 21,
    }
  }
}

// Response bodies of the handful of endpoints read by the facade

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LobbyState {
  #[serde(default)]
  pub can_start_activity: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchStateError {
  #[serde(default)]
  pub penalty_time_remaining: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchState {
  #[serde(default)]
  pub errors: Vec<SearchStateError>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginSession {
  #[serde(default)]
  pub state: String,
}

/// Port and password of a running client, as read from its lockfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcuConnection {
  pub process_name: String,
  pub pid: String,
  pub port: String,
  pub password: String,
  pub protocol: String,
}

impl LcuConnection {
  pub fn base_url(&self) -> String {
    format!("{}://127.0.0.1:{}", self.protocol, self.port)
  }
}
