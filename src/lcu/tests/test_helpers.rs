// Test helpers: an in-memory League Client that keeps lobby and champ select state

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::error::LcuError;
use crate::lcu::client::{ClientSettings, GameClient};
use crate::lcu::request::{LcuResponse, ResilientClient, RetryPolicy, Transport};
use crate::lcu::types::{
  ActionCell, ActionKind, ChampSelectSession, ChampSelectTimer, ChampionId, Phase, TimerPhase,
};

const ACTIONS_PREFIX: &str = "/lol-champ-select/v1/session/actions/";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
  pub method: Method,
  pub path: String,
  pub body: Option<Value>,
}

/// Injected failure for the next matching request.
#[derive(Debug, Clone, Copy)]
pub enum Injected {
  Status(u16),
  Transport,
}

#[derive(Default)]
pub struct FakeState {
  /// Gameflow phases returned in order; the last one repeats.
  pub phases: VecDeque<Phase>,
  /// Login states returned in order; the last one repeats. Empty means `SUCCEEDED`.
  pub login_states: VecDeque<String>,
  pub session: Option<ChampSelectSession>,
  /// Report `FINALIZATION` once every local ban/pick cell is completed.
  pub auto_finalize: bool,
  pub bannable: Vec<ChampionId>,
  pub pickable: Vec<ChampionId>,
  pub can_start: bool,
  pub penalty_secs: Option<f64>,
  pub injected: HashMap<(Method, String), VecDeque<Injected>>,
  pub live: HashMap<String, Value>,
  pub requests: Vec<RecordedRequest>,
}

#[derive(Default)]
pub struct FakeLcu {
  state: Mutex<FakeState>,
}

impl FakeLcu {
  pub fn new() -> Arc<Self> {
    let fake = Self::default();
    fake.with(|s| s.can_start = true);
    Arc::new(fake)
  }

  pub fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
    let mut state = self.state.lock().unwrap();
    f(&mut state)
  }

  pub fn set_phases(&self, phases: &[Phase]) {
    self.with(|s| s.phases = phases.iter().copied().collect());
  }

  pub fn set_session(&self, session: ChampSelectSession) {
    self.with(|s| s.session = Some(session));
  }

  pub fn inject(&self, method: Method, path: &str, failures: &[Injected]) {
    self.with(|s| {
      s.injected
        .entry((method, path.to_string()))
        .or_default()
        .extend(failures.iter().cloned());
    });
  }

  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.with(|s| s.requests.clone())
  }

  /// Requests other than reads, in order, as `"METHOD path"`.
  pub fn writes(&self) -> Vec<String> {
    self
      .requests()
      .into_iter()
      .filter(|r| r.method != Method::GET)
      .map(|r| format!("{} {}", r.method, r.path))
      .collect()
  }

  pub fn count(&self, method: Method, path: &str) -> usize {
    self
      .requests()
      .iter()
      .filter(|r| r.method == method && r.path == path)
      .count()
  }

  fn handle(&self, method: &Method, path: &str, body: Option<&Value>) -> LcuResponse {
    let mut s = self.state.lock().unwrap();
    s.requests.push(RecordedRequest {
      method: method.clone(),
      path: path.to_string(),
      body: body.cloned(),
    });

    if let Some(queue) = s.injected.get_mut(&(method.clone(), path.to_string())) {
      match queue.pop_front() {
        Some(Injected::Status(status)) => return LcuResponse::new(status, "injected"),
        Some(Injected::Transport) => return LcuResponse::new(0, "transport"),
        None => {}
      }
    }

    match (method.as_str(), path) {
      ("GET", "/lol-gameflow/v1/gameflow-phase") => {
        let phase = next_sticky(&mut s.phases).unwrap_or(Phase::None);
        ok(json!(phase))
      }
      ("GET", "/lol-login/v1/session") => {
        let state = next_sticky(&mut s.login_states).unwrap_or_else(|| "SUCCEEDED".to_string());
        ok(json!({ "state": state }))
      }
      ("GET", "/lol-lobby/v2/lobby") => ok(json!({ "canStartActivity": s.can_start })),
      ("GET", "/lol-lobby/v2/lobby/matchmaking/search-state") => match s.penalty_secs {
        Some(secs) => ok(json!({ "errors": [ { "penaltyTimeRemaining": secs } ] })),
        None => ok(json!({ "errors": [] })),
      },
      ("GET", "/lol-champ-select/v1/pickable-champion-ids") => ok(json!(s.pickable)),
      ("GET", "/lol-champ-select/v1/bannable-champion-ids") => ok(json!(s.bannable)),
      ("GET", "/lol-champ-select/v1/session") => {
        let auto_finalize = s.auto_finalize;
        match s.session.as_mut() {
          Some(session) => {
            if auto_finalize && local_turns_done(session) {
              session.timer.phase = TimerPhase::Finalization;
            }
            ok(json!(session))
          }
          None => LcuResponse::new(404, "no session"),
        }
      }
      ("PATCH", p) if p.starts_with(ACTIONS_PREFIX) => {
        let champion = body
          .and_then(|b| b.get("championId"))
          .and_then(|v| v.as_i64())
          .unwrap_or(0);
        match action_mut(&mut s, p) {
          Some(cell) => {
            cell.champion_id = ChampionId(champion);
            LcuResponse::new(204, "")
          }
          None => LcuResponse::new(404, "no action"),
        }
      }
      ("POST", p) if p.starts_with(ACTIONS_PREFIX) && p.ends_with("/complete") => {
        match action_mut(&mut s, p.trim_end_matches("/complete")) {
          Some(cell) => {
            cell.completed = true;
            LcuResponse::new(204, "")
          }
          None => LcuResponse::new(404, "no action"),
        }
      }
      (_, p) if p.starts_with("/liveclientdata/") => match s.live.get(p) {
        Some(value) => ok(value.clone()),
        None => LcuResponse::new(404, "no live data"),
      },
      ("POST", "/lol-login/v1/delete-rso-on-close")
      | ("POST", "/lol-lobby/v2/lobby")
      | ("PUT", "/lol-lobby/v2/lobby/members/localMember/position-preferences")
      | ("POST", "/lol-lobby/v2/lobby/matchmaking/search")
      | ("POST", "/lol-matchmaking/v1/ready-check/accept")
      | ("PATCH", "/lol-champ-select/v1/session/my-selection")
      | ("POST", "/lol-end-of-game/v1/state/dismiss-stats")
      | ("POST", "/lol-gameflow/v1/reconnect") => LcuResponse::new(204, ""),
      _ => LcuResponse::new(404, "unknown endpoint"),
    }
  }
}

#[async_trait]
impl Transport for FakeLcu {
  async fn send(
    &self,
    method: Method,
    path: &str,
    body: Option<&Value>,
  ) -> Result<LcuResponse, LcuError> {
    let response = self.handle(&method, path, body);
    if response.status == 0 {
      return Err(LcuError::Transport("connection refused".to_string()));
    }
    Ok(response)
  }
}

fn ok(value: Value) -> LcuResponse {
  LcuResponse::new(200, value.to_string())
}

fn next_sticky<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
  if queue.len() > 1 {
    queue.pop_front()
  } else {
    queue.front().cloned()
  }
}

fn action_mut<'a>(s: &'a mut FakeState, path: &str) -> Option<&'a mut ActionCell> {
  let id: i64 = path.strip_prefix(ACTIONS_PREFIX)?.parse().ok()?;
  s.session
    .as_mut()?
    .actions
    .iter_mut()
    .flatten()
    .find(|cell| cell.id == id)
}

fn local_turns_done(session: &ChampSelectSession) -> bool {
  session
    .actions
    .iter()
    .flatten()
    .filter(|c| c.actor_cell_id == session.local_player_cell_id)
    .filter(|c| matches!(c.kind, ActionKind::Ban | ActionKind::Pick))
    .all(|c| c.completed)
}

pub fn cell(id: i64, actor: i64, kind: ActionKind, completed: bool) -> ActionCell {
  ActionCell {
    id,
    actor_cell_id: actor,
    kind,
    completed,
    champion_id: ChampionId::NONE,
  }
}

pub fn session(local_cell: i64, phase: TimerPhase, actions: Vec<Vec<ActionCell>>) -> ChampSelectSession {
  ChampSelectSession {
    local_player_cell_id: local_cell,
    timer: ChampSelectTimer { phase },
    actions,
  }
}

pub fn test_client(fake: &Arc<FakeLcu>) -> GameClient {
  test_client_with(fake, ClientSettings::default(), CancellationToken::new())
}

pub fn test_client_with(
  fake: &Arc<FakeLcu>,
  settings: ClientSettings,
  cancel: CancellationToken,
) -> GameClient {
  let http = ResilientClient::new(fake.clone(), RetryPolicy::default());
  GameClient::new(http, settings, cancel)
}
