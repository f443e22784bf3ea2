// tracing setup: console output plus an on-disk log

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE: &str = "bot-logs.log";

/// Installs the global subscriber. The console follows `RUST_LOG` when set, else `info`
/// (`debug` when `verbose`). The file always records this crate at `debug`. Returns the log
/// file path, or `None` when it could not be opened.
pub fn init(log_dir: &Path, verbose: bool) -> Option<PathBuf> {
  let default_level = if verbose { "debug" } else { "info" };
  let console_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  let (file, file_error) = match open_log_file(log_dir) {
    Ok(opened) => (Some(opened), None),
    Err(e) => (None, Some(e)),
  };
  let file_path = file.as_ref().map(|(path, _)| path.clone());

  let file_layer = file.map(|(_, file)| {
    fmt::layer()
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .with_filter(EnvFilter::new("lcu_bot_lib=debug,lcu_bot=debug"))
  });

  let _ = tracing_subscriber::registry()
    .with(fmt::layer().with_target(false).with_filter(console_filter))
    .with(file_layer)
    .try_init();

  if let Some(e) = file_error {
    tracing::warn!("Failed to open log file in {}: {}", log_dir.display(), e);
  }
  file_path
}

fn open_log_file(log_dir: &Path) -> std::io::Result<(PathBuf, File)> {
  fs::create_dir_all(log_dir)?;
  let path = log_dir.join(LOG_FILE);
  let file = File::options().create(true).append(true).open(&path)?;
  Ok((path, file))
}
