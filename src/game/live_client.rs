// Readers for the in-game Live Client Data API (port 2999)

use std::collections::HashMap;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::input::WindowRatio;
use crate::error::LcuError;
use crate::lcu::request::ResilientClient;

const EVENT_DATA: &str = "/liveclientdata/eventdata";
const ACTIVE_PLAYER: &str = "/liveclientdata/activeplayer";
const PLAYER_LIST: &str = "/liveclientdata/playerlist";
const ACTIVE_PLAYER_ABILITIES: &str = "/liveclientdata/activeplayerabilities";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Team {
  #[serde(rename = "ORDER")]
  Order,
  #[serde(rename = "CHAOS")]
  Chaos,
}

impl Team {
  /// Minimap point over the enemy nexus.
  pub fn enemy_nexus(&self) -> WindowRatio {
    match self {
      Self::Order => WindowRatio::new(0.97, 0.76),
      Self::Chaos => WindowRatio::new(0.82, 0.94),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameEvent {
  #[serde(rename = "EventName")]
  pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameEvents {
  #[serde(rename = "Events", default)]
  pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlayer {
  #[serde(default)]
  pub summoner_name: String,
  #[serde(default)]
  pub current_gold: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntry {
  #[serde(default)]
  pub summoner_name: String,
  pub team: Team,
  #[serde(default)]
  pub is_dead: bool,
  #[serde(default)]
  pub respawn_timer: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityInfo {
  #[serde(default)]
  pub display_name: String,
}

/// Abilities keyed by slot (`Q`, `W`, `E`, `R`, `Passive`).
pub type ActivePlayerAbilities = HashMap<String, AbilityInfo>;

/// Strips the `#tag` suffix of a Riot ID.
pub fn strip_tag(name: &str) -> &str {
  name.split('#').next().unwrap_or(name)
}

pub struct LiveClient {
  http: ResilientClient,
}

impl LiveClient {
  pub fn new(http: ResilientClient) -> Self {
    Self { http }
  }

  async fn read<T: DeserializeOwned>(&self, path: &str) -> Result<T, LcuError> {
    self
      .http
      .get(path)
      .await?
      .error_for_status(Method::GET, path)?
      .json(path)
  }

  pub async fn events(&self) -> Result<GameEvents, LcuError> {
    self.read(EVENT_DATA).await
  }

  pub async fn active_player(&self) -> Result<ActivePlayer, LcuError> {
    self.read(ACTIVE_PLAYER).await
  }

  pub async fn player_list(&self) -> Result<Vec<PlayerEntry>, LcuError> {
    self.read(PLAYER_LIST).await
  }

  pub async fn abilities(&self) -> Result<ActivePlayerAbilities, LcuError> {
    self.read(ACTIVE_PLAYER_ABILITIES).await
  }
}
