// Gameplay step vocabulary shared by strategies and the player executor

use serde::{Deserialize, Serialize};

/// An item in a strategy's build path. `name` is typed into the shop search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
  pub name: String,
  pub price: u32,
}

impl ShopItem {
  pub fn new(name: &str, price: u32) -> Self {
    Self {
      name: name.to_string(),
      price,
    }
  }
}

/// One action of an in-game sequence, run once per gameplay tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum GameplayStep {
  LockCamera,
  GoToEnemyNexus,
  /// Hold the ally camera key (`f1`..`f5`) and move to the screen centre.
  GoToAlly { key: String },
  UseSpell { key: String },
  UpgradeAbility { key: String },
  BuyNextItem,
  /// Branch on the current display name of an ability slot, e.g. Yuumi's `W` while attached.
  IfAbilityNamed {
    slot: String,
    display_name: String,
    then: Vec<GameplayStep>,
    #[serde(default)]
    otherwise: Vec<GameplayStep>,
  },
}

impl GameplayStep {
  pub fn go_to_ally(key: &str) -> Self {
    Self::GoToAlly {
      key: key.to_string(),
    }
  }

  pub fn use_spell(key: &str) -> Self {
    Self::UseSpell {
      key: key.to_string(),
    }
  }

  pub fn upgrade_ability(key: &str) -> Self {
    Self::UpgradeAbility {
      key: key.to_string(),
    }
  }
}
