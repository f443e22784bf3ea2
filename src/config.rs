// Bot configuration file, data directory and LCU lockfile handling

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::bot::{BotSettings, BotStrategy, PRESETS};
use crate::error::{ConfigError, LcuError};
use crate::game::GameplaySettings;
use crate::lcu::client::ClientSettings;
use crate::lcu::request::RetryPolicy;
use crate::lcu::types::LcuConnection;
use crate::util::sleep_or_cancel;

pub const CONFIG_FILE: &str = "config.json";
pub const LOCKFILE_NAMES: [&str; 3] = ["lockfile", "LeagueClientUx.lockfile", "LeagueClient.lockfile"];
const LOCKFILE_POLL: Duration = Duration::from_secs(3);

const COMMON_INSTALL_PATHS: [&str; 3] = [
  r"C:\Riot Games\League of Legends",
  r"C:\Program Files\Riot Games\League of Legends",
  r"C:\Program Files (x86)\Riot Games\League of Legends",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
  pub max_attempts: u32,
  pub initial_delay_ms: u64,
  pub max_delay_ms: u64,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_attempts: 5,
      initial_delay_ms: 1_000,
      max_delay_ms: 16_000,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
  pub league_path: PathBuf,
  /// Preset name, or the name of `custom_strategy`.
  pub strategy: String,
  pub custom_strategy: Option<BotStrategy>,
  pub settle_delay_ms: u64,
  pub retry: RetryConfig,
  pub max_penalty_wait_secs: u64,
  pub max_respawn_wait_secs: u64,
  pub gameplay_tick_ms: u64,
  pub error_backoff_ms: u64,
  pub connect_timeout_secs: u64,
  pub accept_invalid_certs: bool,
  pub live_client_port: u16,
  /// Defaults to `<data_dir>/logs`.
  pub log_dir: Option<PathBuf>,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      league_path: detect_league_path(),
      strategy: "yuumi".to_string(),
      custom_strategy: None,
      settle_delay_ms: 3_000,
      retry: RetryConfig::default(),
      max_penalty_wait_secs: 30 * 60,
      max_respawn_wait_secs: 120,
      gameplay_tick_ms: 5_000,
      error_backoff_ms: 5_000,
      connect_timeout_secs: 60,
      accept_invalid_certs: true,
      live_client_port: 2999,
      log_dir: None,
    }
  }
}

impl BotConfig {
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Like [`BotConfig::load`], but a missing file yields the defaults.
  pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
    match Self::load(path) {
      Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
        Ok(Self::default())
      }
      other => other,
    }
  }

  pub fn resolve_strategy(&self) -> Result<BotStrategy, ConfigError> {
    if let Some(strategy) = BotStrategy::preset(&self.strategy) {
      return Ok(strategy);
    }
    match &self.custom_strategy {
      Some(custom) if custom.name == self.strategy => Ok(custom.clone()),
      _ => Err(ConfigError::UnknownStrategy(format!(
        "{} (presets: {})",
        self.strategy,
        PRESETS.join(", ")
      ))),
    }
  }

  pub fn log_dir(&self) -> PathBuf {
    self
      .log_dir
      .clone()
      .unwrap_or_else(|| data_dir().join("logs"))
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_attempts: self.retry.max_attempts,
      initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
      max_delay: Duration::from_millis(self.retry.max_delay_ms),
    }
  }

  pub fn client_settings(&self) -> ClientSettings {
    ClientSettings {
      settle_delay: Duration::from_millis(self.settle_delay_ms),
      max_penalty_wait: Duration::from_secs(self.max_penalty_wait_secs),
    }
  }

  pub fn gameplay_settings(&self) -> GameplaySettings {
    GameplaySettings {
      max_respawn_wait: Duration::from_secs(self.max_respawn_wait_secs),
      ..GameplaySettings::default()
    }
  }

  pub fn bot_settings(&self) -> BotSettings {
    BotSettings {
      gameplay_tick: Duration::from_millis(self.gameplay_tick_ms),
      error_backoff: Duration::from_millis(self.error_backoff_ms),
    }
  }

  pub fn connect_timeout(&self) -> Duration {
    Duration::from_secs(self.connect_timeout_secs)
  }

  pub fn live_client_url(&self) -> String {
    format!("https://127.0.0.1:{}", self.live_client_port)
  }
}

/// `%PROGRAMDATA%\lcu-bot` on Windows, `./lcu-bot` elsewhere.
pub fn data_dir() -> PathBuf {
  #[cfg(target_os = "windows")]
  {
    if let Some(program_data) = std::env::var_os("PROGRAMDATA") {
      return PathBuf::from(program_data).join("lcu-bot");
    }
  }
  PathBuf::from("lcu-bot")
}

/// First common install directory holding `LeagueClient.exe`, else the default Riot path.
pub fn detect_league_path() -> PathBuf {
  COMMON_INSTALL_PATHS
    .iter()
    .map(PathBuf::from)
    .find(|path| path.join("LeagueClient.exe").exists())
    .unwrap_or_else(|| PathBuf::from(COMMON_INSTALL_PATHS[0]))
}

/// Parses `name:pid:port:password:protocol`.
pub fn parse_lockfile(path: &Path, content: &str) -> Result<LcuConnection, ConfigError> {
  let malformed = |reason: &str| ConfigError::MalformedLockfile {
    path: path.to_path_buf(),
    reason: reason.to_string(),
  };

  let parts: Vec<&str> = content.trim().split(':').collect();
  if parts.len() < 5 {
    return Err(malformed("expected name:pid:port:password:protocol"));
  }
  if parts[2].parse::<u16>().is_err() {
    return Err(malformed("port is not a number"));
  }
  if parts[3].is_empty() {
    return Err(malformed("empty password"));
  }

  Ok(LcuConnection {
    process_name: parts[0].to_string(),
    pid: parts[1].to_string(),
    port: parts[2].to_string(),
    password: parts[3].to_string(),
    protocol: parts[4].to_string(),
  })
}

/// Reads the first valid lockfile in `league_path`.
pub fn read_lockfile(league_path: &Path) -> Result<LcuConnection, ConfigError> {
  let mut last_error = None;
  for name in LOCKFILE_NAMES {
    let path = league_path.join(name);
    match fs::read_to_string(&path) {
      Ok(content) => match parse_lockfile(&path, &content) {
        Ok(connection) => return Ok(connection),
        Err(e) => last_error = Some(e),
      },
      Err(e) if e.kind() == ErrorKind::NotFound => {}
      Err(source) => last_error = Some(ConfigError::Io { path, source }),
    }
  }
  Err(last_error.unwrap_or_else(|| ConfigError::LockfileNotFound(league_path.to_path_buf())))
}

/// Polls for a valid lockfile until one appears or `cancel` fires.
pub async fn wait_for_lockfile(
  league_path: &Path,
  cancel: &CancellationToken,
) -> Result<LcuConnection, LcuError> {
  let mut reported = false;
  loop {
    match read_lockfile(league_path) {
      Ok(connection) => {
        info!(
          "Found LCU lockfile for {} on port {}",
          connection.process_name, connection.port
        );
        return Ok(connection);
      }
      Err(e) if !reported => {
        info!("No valid lockfile found. Is League running? {}", e);
        reported = true;
      }
      Err(e) => debug!("Still waiting for lockfile: {}", e),
    }
    sleep_or_cancel(LOCKFILE_POLL, cancel).await?;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

  fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
      "lcu-bot-test-{}-{}-{}",
      tag,
      std::process::id(),
      DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn test_parse_lockfile() {
    let connection =
      parse_lockfile(Path::new("lockfile"), "LeagueClient:1234:53012:s3cr3t:https\n").unwrap();
    assert_eq!(connection.port, "53012");
    assert_eq!(connection.password, "s3cr3t");
    assert_eq!(connection.base_url(), "https://127.0.0.1:53012");
  }

  #[test]
  fn test_parse_lockfile_rejects_garbage() {
    assert!(matches!(
      parse_lockfile(Path::new("lockfile"), "LeagueClient:1234"),
      Err(ConfigError::MalformedLockfile { .. })
    ));
    assert!(matches!(
      parse_lockfile(Path::new("lockfile"), "LeagueClient:1234:port:pw:https"),
      Err(ConfigError::MalformedLockfile { .. })
    ));
  }

  #[test]
  fn test_read_lockfile_falls_back_to_other_names() {
    let dir = temp_dir("lockfile");
    fs::write(dir.join("LeagueClientUx.lockfile"), "LeagueClientUx:9:6000:pw:https").unwrap();

    let connection = read_lockfile(&dir).unwrap();
    assert_eq!(connection.process_name, "LeagueClientUx");

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_read_lockfile_missing() {
    let dir = temp_dir("empty");
    assert!(matches!(read_lockfile(&dir), Err(ConfigError::LockfileNotFound(_))));
    let _ = fs::remove_dir_all(&dir);
  }

  #[tokio::test(start_paused = true)]
  async fn test_wait_for_lockfile_is_cancellable() {
    let dir = temp_dir("wait");
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
      tokio::time::sleep(Duration::from_secs(10)).await;
      trigger.cancel();
    });

    let result = wait_for_lockfile(&dir, &cancel).await;
    assert!(matches!(result, Err(LcuError::Cancelled)));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_missing_config_yields_defaults() {
    let dir = temp_dir("config");
    let config = BotConfig::load_or_default(&dir.join(CONFIG_FILE)).unwrap();
    assert_eq!(config, BotConfig::default());
    assert_eq!(config.retry_policy(), RetryPolicy::default());
    assert!(config.accept_invalid_certs);
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_partial_config_keeps_other_defaults() {
    let dir = temp_dir("partial");
    let path = dir.join(CONFIG_FILE);
    fs::write(&path, r#"{ "strategy": "disco-nunu", "retry": { "max_attempts": 2 } }"#).unwrap();

    let config = BotConfig::load_or_default(&path).unwrap();
    assert_eq!(config.strategy, "disco-nunu");
    assert_eq!(config.retry.max_attempts, 2);
    assert_eq!(config.retry.max_delay_ms, 16_000);
    assert_eq!(config.live_client_url(), "https://127.0.0.1:2999");
    assert_eq!(config.resolve_strategy().unwrap(), BotStrategy::disco_nunu());
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_invalid_config_is_an_error() {
    let dir = temp_dir("invalid");
    let path = dir.join(CONFIG_FILE);
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
      BotConfig::load_or_default(&path),
      Err(ConfigError::Parse { .. })
    ));
    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_strategy_resolution() {
    let mut config = BotConfig {
      strategy: "sett".to_string(),
      ..BotConfig::default()
    };
    assert!(matches!(
      config.resolve_strategy(),
      Err(ConfigError::UnknownStrategy(_))
    ));

    config.custom_strategy = Some(BotStrategy {
      name: "sett".to_string(),
      ..BotStrategy::disco_nunu()
    });
    assert_eq!(config.resolve_strategy().unwrap().name, "sett");
  }
}
