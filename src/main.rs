// Entry point: load config, wait for the client, run the bot until Ctrl-C

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use lcu_bot_lib::config::{self, wait_for_lockfile, BotConfig, CONFIG_FILE};
use lcu_bot_lib::game::{LiveClient, PlayerChampion, SystemProcesses, TracingInputDevice};
use lcu_bot_lib::lcu::{GameClient, HttpTransport, ResilientClient};
use lcu_bot_lib::{logging, Bot, BotError, LcuError};

const CONNECT_POLL: std::time::Duration = std::time::Duration::from_secs(5);

/// Queues, picks and plays League of Legends matches through the local client API
#[derive(Parser, Debug)]
#[command(name = "lcu-bot", version)]
struct Cli {
  /// Config file (defaults to <data dir>/config.json)
  #[arg(long, env = "LCU_BOT_CONFIG")]
  config: Option<PathBuf>,

  /// Strategy preset or custom strategy name
  #[arg(long)]
  strategy: Option<String>,

  /// League of Legends install directory holding the lockfile
  #[arg(long)]
  league_path: Option<PathBuf>,

  /// Debug output on the console
  #[arg(long, short = 'v')]
  verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{}", e);
      eprintln!("lcu-bot: {}", e);
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> Result<(), BotError> {
  let config_path = cli
    .config
    .unwrap_or_else(|| config::data_dir().join(CONFIG_FILE));
  let mut config = BotConfig::load_or_default(&config_path)?;
  if let Some(strategy) = cli.strategy {
    config.strategy = strategy;
  }
  if let Some(league_path) = cli.league_path {
    config.league_path = league_path;
  }

  if let Some(log_file) = logging::init(&config.log_dir(), cli.verbose) {
    info!("Writing logs to {}", log_file.display());
  }
  info!("Using config {}", config_path.display());
  let strategy = config.resolve_strategy()?;

  let cancel = CancellationToken::new();
  let on_signal = cancel.clone();
  tokio::spawn(async move {
    match tokio::signal::ctrl_c().await {
      Ok(()) => info!("Ctrl-C received, shutting down"),
      Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
    }
    on_signal.cancel();
  });

  match start(config, strategy, cancel).await {
    Err(BotError::Lcu(LcuError::Cancelled)) => {
      info!("Cancelled before the bot started");
      Ok(())
    }
    other => other,
  }
}

async fn start(
  config: BotConfig,
  strategy: lcu_bot_lib::BotStrategy,
  cancel: CancellationToken,
) -> Result<(), BotError> {
  let connection = wait_for_lockfile(&config.league_path, &cancel).await?;

  let lcu = HttpTransport::new(
    connection.base_url(),
    Some(&connection.password),
    config.accept_invalid_certs,
  );
  let client = GameClient::new(
    ResilientClient::new(Arc::new(lcu), config.retry_policy()),
    config.client_settings(),
    cancel.clone(),
  );
  client.connect(config.connect_timeout(), CONNECT_POLL).await?;

  let live = HttpTransport::new(config.live_client_url(), None, config.accept_invalid_certs);
  let player = PlayerChampion::new(
    LiveClient::new(ResilientClient::new(Arc::new(live), config.retry_policy())),
    Arc::new(TracingInputDevice),
    Arc::new(SystemProcesses),
    config.gameplay_settings(),
    cancel.clone(),
  );

  let bot = Bot::new(client, player, strategy, config.bot_settings(), cancel);
  bot.main_loop().await;
  Ok(())
}
