use std::fmt;
use std::io;
use std::path::PathBuf;

use reqwest::Method;
use thiserror::Error;

// Error handling for LCU, config and top-level bot operations

/// Last observed failure of a retried request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
  Status { status: u16, body: String },
  Transport(String),
}

impl fmt::Display for Failure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Status { status, body } if body.is_empty() => write!(f, "status {}", status),
      Self::Status { status, body } => write!(f, "status {} ({})", status, body),
      Self::Transport(msg) => write!(f, "transport error: {}", msg),
    }
  }
}

#[derive(Debug, Error)]
pub enum LcuError {
  #[error("{path}: retries exhausted after {attempts} attempts, last failure: {last}")]
  RetriesExhausted {
    path: String,
    attempts: u32,
    last: Failure,
  },

  #[error("{method} {path} returned status {status}")]
  Status {
    method: Method,
    path: String,
    status: u16,
    body: String,
  },

  #[error("transport error: {0}")]
  Transport(String),

  #[error("failed to decode response from {path}: {source}")]
  Decode {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("unexpected lobby state, can't start matchmaking")]
  LobbyNotReady,

  #[error("client login did not succeed within {0} seconds")]
  ClientNotReady(u64),

  #[error("operation cancelled")]
  Cancelled,
}

impl From<reqwest::Error> for LcuError {
  fn from(err: reqwest::Error) -> Self {
    Self::Transport(err.to_string())
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("LCU lockfile not found in {0}")]
  LockfileNotFound(PathBuf),

  #[error("malformed lockfile {path}: {reason}")]
  MalformedLockfile { path: PathBuf, reason: String },

  #[error("unknown strategy '{0}'")]
  UnknownStrategy(String),
}

#[derive(Debug, Error)]
pub enum BotError {
  #[error(transparent)]
  Lcu(#[from] LcuError),

  #[error(transparent)]
  Config(#[from] ConfigError),
}
