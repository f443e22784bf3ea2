// Phase-driven orchestrator: client handling, champion select, gameplay, repeat

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::strategy::BotStrategy;
use super::types::{BotSettings, MatchContext};
use crate::error::LcuError;
use crate::game::PlayerChampion;
use crate::lcu::client::GameClient;
use crate::lcu::session::{resolve_turn, TurnOutcome};
use crate::lcu::types::{ActionKind, Phase, TimerPhase};
use crate::util::sleep_or_cancel;

pub struct Bot {
  client: GameClient,
  player: PlayerChampion,
  strategy: BotStrategy,
  settings: BotSettings,
  cancel: CancellationToken,
}

impl Bot {
  pub fn new(
    client: GameClient,
    player: PlayerChampion,
    strategy: BotStrategy,
    settings: BotSettings,
    cancel: CancellationToken,
  ) -> Self {
    Self {
      client,
      player,
      strategy,
      settings,
      cancel,
    }
  }

  /// Runs match cycles until cancelled. A cycle that fails is logged and retried after the
  /// error backoff.
  pub async fn main_loop(&self) {
    info!("[Bot] Running strategy '{}'", self.strategy.name);

    let mut ctx = MatchContext::default();
    while !self.cancel.is_cancelled() {
      match self.run_match_cycle(&mut ctx).await {
        Ok(()) => {}
        Err(LcuError::Cancelled) => break,
        Err(e) => {
          error!("[Bot] Match cycle failed: {}", e);
          if sleep_or_cancel(self.settings.error_backoff, &self.cancel)
            .await
            .is_err()
          {
            break;
          }
        }
      }
    }

    info!("[Bot] Stopped");
  }

  /// One pass of client handling, champion select and gameplay. The context starts fresh unless
  /// the previous cycle failed inside champion select, in which case that match is resumed.
  pub async fn run_match_cycle(&self, ctx: &mut MatchContext) -> Result<(), LcuError> {
    if ctx.in_champion_select {
      info!("[Bot] Resuming champion select");
    } else {
      *ctx = MatchContext::default();
      self.handle_client(ctx).await?;
    }
    self.handle_champion_select(ctx).await?;
    self.handle_gameplay(ctx).await
  }

  /// Creates the lobby, queues, accepts the match, dismisses end-of-game and reconnects,
  /// depending on the phase. Returns on any other phase.
  pub async fn handle_client(&self, ctx: &mut MatchContext) -> Result<(), LcuError> {
    ctx.has_acted_on_ban_round = false;

    loop {
      let phase = self.client.phase().await?;
      let result = match phase {
        Phase::None => self.client.create_lobby(self.strategy.lobby).await,
        Phase::Lobby => self.queue_up().await,
        Phase::ReadyCheck => self.client.accept_match().await,
        Phase::EndOfGame => self.client.skip_end_of_game().await,
        Phase::Reconnect => self.client.reconnect().await,
        _ => return Ok(()),
      };
      recoverable(phase, result)?;
    }
  }

  async fn queue_up(&self) -> Result<(), LcuError> {
    self
      .client
      .select_positions(self.strategy.primary_position, self.strategy.secondary_position)
      .await?;
    self.client.start_queue().await
  }

  /// Bans once, picks on every poll until our pick is confirmed, then picks spells during
  /// finalization. Returns as soon as the client leaves champion select.
  /// An error leaves `ctx` marked as inside champion select.
  pub async fn handle_champion_select(&self, ctx: &mut MatchContext) -> Result<(), LcuError> {
    ctx.in_champion_select = true;
    loop {
      if self.client.phase().await? != Phase::ChampSelect {
        ctx.in_champion_select = false;
        return Ok(());
      }

      let session = match self.client.champ_select_session().await {
        Ok(session) => session,
        Err(LcuError::Cancelled) => return Err(LcuError::Cancelled),
        Err(e) => {
          warn!("[Bot] Champion select session unavailable: {}", e);
          continue;
        }
      };

      match session.timer.phase {
        TimerPhase::Finalization => {
          let spells = self
            .client
            .select_summoner_spells(self.strategy.spell1, self.strategy.spell2)
            .await;
          recoverable(Phase::ChampSelect, spells)?;
          info!("Champion Select completed. Waiting for game to start.");
          ctx.in_champion_select = false;
          return Ok(());
        }
        TimerPhase::BanPick => {
          if !ctx.has_acted_on_ban_round {
            let ban = resolve_turn(
              &self.client,
              &session,
              &self.strategy.bans,
              ActionKind::Ban,
              &mut ctx.confirmed_actions,
            )
            .await;
            if let Some(outcome) = log_outcome(ActionKind::Ban, ban)? {
              ctx.has_acted_on_ban_round = outcome.settles_ban();
            }
          }

          let pick = resolve_turn(
            &self.client,
            &session,
            &self.strategy.picks,
            ActionKind::Pick,
            &mut ctx.confirmed_actions,
          )
          .await;
          log_outcome(ActionKind::Pick, pick)?;
        }
        TimerPhase::Other => debug!("Champion select timer phase not actionable yet"),
      }
    }
  }

  /// Runs the strategy's gameplay sequence every tick while the game is in progress.
  pub async fn handle_gameplay(&self, ctx: &mut MatchContext) -> Result<(), LcuError> {
    loop {
      if self.client.phase().await? != Phase::InProgress {
        return Ok(());
      }

      let tick = self
        .player
        .run_sequence(&self.strategy.gameplay, &self.strategy.items, &mut ctx.player)
        .await;
      recoverable(Phase::InProgress, tick)?;

      sleep_or_cancel(self.settings.gameplay_tick, &self.cancel).await?;
    }
  }
}

/// Swallows failures the next poll can recover from. Cancellation and exhausted retries end
/// the current stage.
fn recoverable(phase: Phase, result: Result<(), LcuError>) -> Result<(), LcuError> {
  match result {
    Ok(()) => Ok(()),
    Err(e @ (LcuError::Cancelled | LcuError::RetriesExhausted { .. })) => Err(e),
    Err(LcuError::LobbyNotReady) => {
      warn!("[Bot] Lobby not ready to queue, polling again");
      Ok(())
    }
    Err(e) => {
      warn!("[Bot] {} action failed: {}", phase, e);
      Ok(())
    }
  }
}

fn log_outcome(
  kind: ActionKind,
  result: Result<TurnOutcome, LcuError>,
) -> Result<Option<TurnOutcome>, LcuError> {
  match result {
    Ok(outcome) => {
      match &outcome {
        TurnOutcome::Committed { champion, .. } => info!("[Bot] {} of {} confirmed", kind, champion),
        TurnOutcome::CommitFailed { reason, .. } => warn!("[Bot] {} not confirmed: {}", kind, reason),
        TurnOutcome::NoCandidate | TurnOutcome::NotMyTurn => {}
      }
      Ok(Some(outcome))
    }
    Err(LcuError::Cancelled) => Err(LcuError::Cancelled),
    Err(e) => {
      warn!("[Bot] Could not resolve {} turn: {}", kind, e);
      Ok(None)
    }
  }
}
