// In-game player state and the executor for gameplay steps

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::input::{InputDevice, MouseButton, WindowRatio};
use super::live_client::{strip_tag, LiveClient, Team};
use super::process::{ProcessControl, GAME_PROCESS};
use super::steps::{GameplayStep, ShopItem};
use crate::error::LcuError;
use crate::util::{bounded_wait, secs_f64, sleep_or_cancel};

#[derive(Debug, Clone)]
pub struct GameplaySettings {
  /// Upper bound for a reported respawn timer.
  pub max_respawn_wait: Duration,
  /// Pause between the inputs of a multi-key step.
  pub action_pause: Duration,
}

impl Default for GameplaySettings {
  fn default() -> Self {
    Self {
      max_respawn_wait: Duration::from_secs(120),
      action_pause: Duration::from_secs(1),
    }
  }
}

/// What the bot knows about its champion in the current match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerState {
  pub summoner_name: Option<String>,
  pub current_gold: f64,
  pub side: Option<Team>,
  pub is_alive: bool,
  pub game_in_progress: bool,
  pub game_over: bool,
  pub items_bought: usize,
}

impl PlayerState {
  pub fn can_act(&self) -> bool {
    self.side.is_some() && self.is_alive && self.game_in_progress
  }

  pub fn can_shop(&self) -> bool {
    self.side.is_some() && self.game_in_progress
  }
}

pub struct PlayerChampion {
  live: LiveClient,
  input: Arc<dyn InputDevice>,
  processes: Arc<dyn ProcessControl>,
  settings: GameplaySettings,
  cancel: CancellationToken,
}

impl PlayerChampion {
  pub fn new(
    live: LiveClient,
    input: Arc<dyn InputDevice>,
    processes: Arc<dyn ProcessControl>,
    settings: GameplaySettings,
    cancel: CancellationToken,
  ) -> Self {
    Self {
      live,
      input,
      processes,
      settings,
      cancel,
    }
  }

  /// Refreshes `state` from the live game. Closes the game once it reports `GameEnd`, and
  /// waits out the respawn timer while the champion is dead.
  pub async fn update_player_data(&self, state: &mut PlayerState) -> Result<(), LcuError> {
    if !self.processes.is_running(GAME_PROCESS).await {
      debug!("Game process not running, keeping previous player data");
      return Ok(());
    }

    debug!("Setting game state");
    let events = self.live.events().await?;
    for event in &events.events {
      match event.name.as_str() {
        "GameEnd" => {
          state.game_in_progress = false;
          state.game_over = true;
          break;
        }
        "GameStart" => state.game_in_progress = true,
        _ => {}
      }
    }

    if state.game_over {
      info!("Game ended, closing {}", GAME_PROCESS);
      self.processes.terminate(GAME_PROCESS).await;
      return Ok(());
    }
    if !state.game_in_progress {
      return Ok(());
    }

    debug!("Setting player summoner name");
    let active = self.live.active_player().await?;
    let name = strip_tag(&active.summoner_name).to_string();
    state.current_gold = active.current_gold;

    debug!("Setting player state");
    let players = self.live.player_list().await?;
    if let Some(me) = players
      .iter()
      .find(|player| strip_tag(&player.summoner_name) == name)
    {
      state.side = Some(me.team);
      state.is_alive = !me.is_dead;
      if me.is_dead {
        let wait = bounded_wait(
          secs_f64(me.respawn_timer),
          self.settings.max_respawn_wait,
          "Respawn timer",
        );
        info!("Champion is dead, respawning in {:?}", wait);
        sleep_or_cancel(wait, &self.cancel).await?;
      }
    }
    state.summoner_name = Some(name);
    Ok(())
  }

  /// Runs `steps` in order, expanding ability-name branches as they are reached.
  pub async fn run_sequence(
    &self,
    steps: &[GameplayStep],
    items: &[ShopItem],
    state: &mut PlayerState,
  ) -> Result<(), LcuError> {
    let mut pending: Vec<&GameplayStep> = steps.iter().rev().collect();

    while let Some(step) = pending.pop() {
      if let GameplayStep::IfAbilityNamed {
        slot,
        display_name,
        then,
        otherwise,
      } = step
      {
        let branch = if self.ability_named(slot, display_name, state).await? {
          then
        } else {
          otherwise
        };
        pending.extend(branch.iter().rev());
        continue;
      }
      self.run_step(step, items, state).await?;
    }
    Ok(())
  }

  async fn ability_named(
    &self,
    slot: &str,
    display_name: &str,
    state: &PlayerState,
  ) -> Result<bool, LcuError> {
    if !state.can_act() {
      return Ok(false);
    }
    let abilities = self.live.abilities().await?;
    Ok(
      abilities
        .get(slot)
        .is_some_and(|ability| ability.display_name == display_name),
    )
  }

  async fn run_step(
    &self,
    step: &GameplayStep,
    items: &[ShopItem],
    state: &mut PlayerState,
  ) -> Result<(), LcuError> {
    self.update_player_data(state).await?;

    match step {
      GameplayStep::BuyNextItem => return self.buy_next_item(items, state).await,
      // expanded by run_sequence
      GameplayStep::IfAbilityNamed { .. } => return Ok(()),
      _ if !state.can_act() => return Ok(()),
      _ => {}
    }

    match step {
      GameplayStep::LockCamera => self.input.press_key("y"),
      GameplayStep::GoToEnemyNexus => {
        if let Some(side) = state.side {
          info!("Go to enemy nexus");
          self.input.click(side.enemy_nexus(), MouseButton::Right);
        }
      }
      GameplayStep::GoToAlly { key } => {
        info!("Going to ally champion {}", key);
        self.input.hold_key(key);
        self.pause(1).await?;
        self.input.click(WindowRatio::CENTER, MouseButton::Right);
        self.pause(1).await?;
        self.input.release_key(key);
        self.pause(1).await?;
      }
      GameplayStep::UseSpell { key } => {
        info!("Using ability {}", key);
        self.input.press_key(key);
      }
      GameplayStep::UpgradeAbility { key } => {
        info!("Upgrading ability {}", key);
        self.input.press_key(&format!("ctrl+{}", key));
      }
      GameplayStep::BuyNextItem | GameplayStep::IfAbilityNamed { .. } => {}
    }
    Ok(())
  }

  async fn buy_next_item(&self, items: &[ShopItem], state: &mut PlayerState) -> Result<(), LcuError> {
    if !state.can_shop() {
      return Ok(());
    }
    let Some(item) = items.get(state.items_bought) else {
      debug!("Item path complete");
      return Ok(());
    };
    if state.current_gold <= f64::from(item.price) {
      debug!(
        "Not enough gold for {} ({} < {})",
        item.name, state.current_gold, item.price
      );
      return Ok(());
    }

    info!("Buying item {}", item.name);
    self.input.press_key("p");
    self.input.press_key("ctrl+l");
    self.pause(1).await?;
    self.input.write_text(&item.name);
    self.pause(1).await?;
    self.input.press_key("enter");
    self.pause(2).await?;
    state.items_bought += 1;
    Ok(())
  }

  async fn pause(&self, times: u32) -> Result<(), LcuError> {
    sleep_or_cancel(self.settings.action_pause * times, &self.cancel).await
  }
}
