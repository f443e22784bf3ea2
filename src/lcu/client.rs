// Typed operations over the League Client API

use std::time::Duration;

use chrono::Local;
use reqwest::Method;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::request::{LcuResponse, ResilientClient};
use super::types::{
  ActionCell, Availability, ChampSelectSession, ChampionId, LobbyState, LobbyType, LoginSession,
  Phase, Position, SearchState, SummonerSpell,
};
use crate::error::LcuError;
use crate::util::{bounded_wait, secs_f64, sleep_or_cancel};

const GAMEFLOW_PHASE: &str = "/lol-gameflow/v1/gameflow-phase";
const LOGIN_SESSION: &str = "/lol-login/v1/session";
const LOBBY: &str = "/lol-lobby/v2/lobby";
const SEARCH_STATE: &str = "/lol-lobby/v2/lobby/matchmaking/search-state";
const SEARCH: &str = "/lol-lobby/v2/lobby/matchmaking/search";
const POSITION_PREFERENCES: &str = "/lol-lobby/v2/lobby/members/localMember/position-preferences";
const READY_CHECK_ACCEPT: &str = "/lol-matchmaking/v1/ready-check/accept";
const CHAMP_SELECT_SESSION: &str = "/lol-champ-select/v1/session";
const MY_SELECTION: &str = "/lol-champ-select/v1/session/my-selection";
const DISMISS_STATS: &str = "/lol-end-of-game/v1/state/dismiss-stats";
const RECONNECT: &str = "/lol-gameflow/v1/reconnect";

pub fn action_path(action_id: i64) -> String {
  format!("/lol-champ-select/v1/session/actions/{}", action_id)
}

pub fn action_complete_path(action_id: i64) -> String {
  format!("/lol-champ-select/v1/session/actions/{}/complete", action_id)
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
  /// Wait before every phase read so the client can publish the previous action's effect.
  pub settle_delay: Duration,
  /// Upper bound for a reported dodge penalty.
  pub max_penalty_wait: Duration,
}

impl Default for ClientSettings {
  fn default() -> Self {
    Self {
      settle_delay: Duration::from_secs(3),
      max_penalty_wait: Duration::from_secs(30 * 60),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
  Stage,
  Confirm,
}

/// Result of one resolve-and-confirm sequence on an action cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStatus {
  Confirmed,
  Rejected { step: CommitStep, status: u16 },
}

pub struct GameClient {
  http: ResilientClient,
  settings: ClientSettings,
  cancel: CancellationToken,
}

impl GameClient {
  pub fn new(http: ResilientClient, settings: ClientSettings, cancel: CancellationToken) -> Self {
    Self {
      http,
      settings,
      cancel,
    }
  }

  /// Waits for the client login to report `SUCCEEDED`, then asks the client to log out when it
  /// closes.
  pub async fn connect(&self, timeout: Duration, delay: Duration) -> Result<(), LcuError> {
    info!("Connecting to Client");
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
      match self.http.get_with_retries(LOGIN_SESSION).await {
        Ok(response) => match response.json::<LoginSession>(LOGIN_SESSION) {
          Ok(session) if session.state == "SUCCEEDED" => break,
          Ok(session) => debug!("Login state: {}", session.state),
          Err(e) => debug!("Login session unreadable: {}", e),
        },
        Err(e) => debug!("Login session unavailable: {}", e),
      }

      if tokio::time::Instant::now() + delay > deadline {
        warn!("Failed to connect to Client within {:?}", timeout);
        return Err(LcuError::ClientNotReady(timeout.as_secs()));
      }
      sleep_or_cancel(delay, &self.cancel).await?;
    }

    info!("Connection to Client Successful");
    let response = self.http.post("/lol-login/v1/delete-rso-on-close", None).await?;
    if !response.is_success() {
      warn!("delete-rso-on-close returned status {}", response.status);
    }
    Ok(())
  }

  /// Fresh gameflow phase. Always waits the settle delay first.
  pub async fn phase(&self) -> Result<Phase, LcuError> {
    sleep_or_cancel(self.settings.settle_delay, &self.cancel).await?;
    let phase: Phase = self
      .http
      .get_with_retries(GAMEFLOW_PHASE)
      .await?
      .json(GAMEFLOW_PHASE)?;
    info!("Current phase: {}", phase);
    Ok(phase)
  }

  pub async fn create_lobby(&self, lobby_type: LobbyType) -> Result<(), LcuError> {
    info!("Creating lobby {:?}", lobby_type);
    let body = json!({ "queueId": lobby_type.queue_id() });
    self
      .http
      .post(LOBBY, Some(&body))
      .await?
      .error_for_status(Method::POST, LOBBY)?;
    Ok(())
  }

  pub async fn select_positions(&self, primary: Position, secondary: Position) -> Result<(), LcuError> {
    info!("Selecting Positions");
    let body = json!({ "firstPreference": primary, "secondPreference": secondary });
    self
      .http
      .put(POSITION_PREFERENCES, Some(&body))
      .await?
      .error_for_status(Method::PUT, POSITION_PREFERENCES)?;
    Ok(())
  }

  pub async fn lobby_can_start(&self) -> Result<bool, LcuError> {
    let lobby: LobbyState = self.http.get_with_retries(LOBBY).await?.json(LOBBY)?;
    Ok(lobby.can_start_activity)
  }

  /// Blocks for the dodge penalty reported by the search state, if any. Returns the time
  /// actually waited.
  pub async fn wait_out_dodge_penalty(&self) -> Result<Duration, LcuError> {
    let state: SearchState = self
      .http
      .get_with_retries(SEARCH_STATE)
      .await?
      .json(SEARCH_STATE)?;

    let Some(error) = state.errors.first() else {
      return Ok(Duration::ZERO);
    };

    let remaining = secs_f64(error.penalty_time_remaining);
    let wait = bounded_wait(remaining, self.settings.max_penalty_wait, "Dodge penalty");
    let resumes_at = Local::now() + chrono::Duration::milliseconds(wait.as_millis() as i64);
    info!(
      "Dodge Timer. Time Remaining: {:?}, queueing again at {}",
      remaining,
      resumes_at.format("%H:%M:%S")
    );
    sleep_or_cancel(wait, &self.cancel).await?;
    Ok(wait)
  }

  /// Waits out any dodge penalty, then starts matchmaking if the lobby allows it.
  pub async fn start_queue(&self) -> Result<(), LcuError> {
    info!("Starting queue");
    self.wait_out_dodge_penalty().await?;
    if !self.lobby_can_start().await? {
      return Err(LcuError::LobbyNotReady);
    }
    self
      .http
      .post(SEARCH, None)
      .await?
      .error_for_status(Method::POST, SEARCH)?;
    Ok(())
  }

  pub async fn accept_match(&self) -> Result<(), LcuError> {
    info!("Accepting match");
    self
      .http
      .post(READY_CHECK_ACCEPT, None)
      .await?
      .error_for_status(Method::POST, READY_CHECK_ACCEPT)?;
    Ok(())
  }

  pub async fn champ_select_session(&self) -> Result<ChampSelectSession, LcuError> {
    self
      .http
      .get_with_retries(CHAMP_SELECT_SESSION)
      .await?
      .json(CHAMP_SELECT_SESSION)
  }

  pub async fn available_champions(&self, availability: Availability) -> Result<Vec<ChampionId>, LcuError> {
    let path = availability.path();
    self.http.get_with_retries(path).await?.json(path)
  }

  pub async fn is_candidate_available(
    &self,
    champion: ChampionId,
    availability: Availability,
  ) -> Result<bool, LcuError> {
    Ok(self.available_champions(availability).await?.contains(&champion))
  }

  /// Stages `champion` on `cell` and confirms it. The session is re-read between the two
  /// steps: a cell that already reads `completed` is not confirmed again, and a cell that
  /// already has `champion` staged is not patched again. Both steps are single attempts.
  pub async fn complete_action(
    &self,
    cell: &ActionCell,
    champion: ChampionId,
  ) -> Result<CommitStatus, LcuError> {
    if cell.champion_id != champion {
      let path = action_path(cell.id);
      let body = json!({ "championId": champion });
      let response = self.http.patch(&path, Some(&body)).await?;
      if !response.is_success() {
        return Ok(rejected(CommitStep::Stage, &response));
      }
    } else {
      debug!("Action {} already has {} staged", cell.id, champion);
    }

    let session = self.champ_select_session().await?;
    if session.find_action(cell.id).is_some_and(|c| c.completed) {
      debug!("Action {} already completed", cell.id);
      return Ok(CommitStatus::Confirmed);
    }

    let response = self.http.post(&action_complete_path(cell.id), None).await?;
    if !response.is_success() {
      return Ok(rejected(CommitStep::Confirm, &response));
    }
    Ok(CommitStatus::Confirmed)
  }

  pub async fn select_summoner_spells(
    &self,
    spell1: SummonerSpell,
    spell2: SummonerSpell,
  ) -> Result<(), LcuError> {
    info!("Summoner spells {:?}, {:?}", spell1, spell2);
    let body = json!({ "spell1Id": spell1.id(), "spell2Id": spell2.id() });
    self
      .http
      .patch(MY_SELECTION, Some(&body))
      .await?
      .error_for_status(Method::PATCH, MY_SELECTION)?;
    Ok(())
  }

  pub async fn skip_end_of_game(&self) -> Result<(), LcuError> {
    info!("Skipping end of game screen");
    self
      .http
      .post(DISMISS_STATS, None)
      .await?
      .error_for_status(Method::POST, DISMISS_STATS)?;
    Ok(())
  }

  pub async fn reconnect(&self) -> Result<(), LcuError> {
    info!("Reconnecting to game");
    self.http.post_with_retries(RECONNECT, None).await?;
    Ok(())
  }
}

fn rejected(step: CommitStep, response: &LcuResponse) -> CommitStatus {
  warn!(
    "{:?} step rejected with status {}: {}",
    step, response.status, response.body
  );
  CommitStatus::Rejected {
    step,
    status: response.status,
  }
}
