// Bot flavors: what to queue for, what to ban and pick, and what to do in game

use serde::{Deserialize, Serialize};

use crate::game::{GameplayStep, ShopItem};
use crate::lcu::types::{ChampionId, LobbyType, Position, SummonerSpell};

/// Names accepted by [`BotStrategy::preset`].
pub const PRESETS: [&str; 2] = ["yuumi", "disco-nunu"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotStrategy {
  pub name: String,
  pub lobby: LobbyType,
  pub primary_position: Position,
  pub secondary_position: Position,
  /// Tried in order, first bannable wins.
  #[serde(default)]
  pub bans: Vec<ChampionId>,
  /// Tried in order, first pickable wins. Nothing pickable means the bot dodges.
  pub picks: Vec<ChampionId>,
  pub spell1: SummonerSpell,
  pub spell2: SummonerSpell,
  /// Run once per gameplay tick while the game is in progress.
  #[serde(default)]
  pub gameplay: Vec<GameplayStep>,
  #[serde(default)]
  pub items: Vec<ShopItem>,
}

impl BotStrategy {
  pub fn preset(name: &str) -> Option<Self> {
    match name {
      "yuumi" => Some(Self::yuumi()),
      "disco-nunu" => Some(Self::disco_nunu()),
      _ => None,
    }
  }

  /// Support Yuumi: attach to the ADC, shield and heal while attached, shop while not.
  pub fn yuumi() -> Self {
    Self {
      name: "yuumi".to_string(),
      lobby: LobbyType::SoloDuo,
      primary_position: Position::Support,
      secondary_position: Position::Bottom,
      bans: vec![ChampionId::LUX],
      picks: vec![ChampionId::YUUMI],
      spell1: SummonerSpell::Heal,
      spell2: SummonerSpell::Ghost,
      gameplay: vec![
        GameplayStep::go_to_ally("f4"),
        GameplayStep::IfAbilityNamed {
          slot: "W".to_string(),
          display_name: "Change of Plan".to_string(),
          then: vec![
            GameplayStep::use_spell("e"),
            GameplayStep::use_spell("r"),
            GameplayStep::use_spell("d"),
          ],
          otherwise: vec![
            GameplayStep::BuyNextItem,
            GameplayStep::use_spell("w"),
            GameplayStep::use_spell("f"),
          ],
        },
        GameplayStep::upgrade_ability("r"),
        GameplayStep::upgrade_ability("e"),
        GameplayStep::upgrade_ability("w"),
        GameplayStep::upgrade_ability("q"),
      ],
      items: vec![
        ShopItem::new("World Atlas", 400),
        ShopItem::new("Dream Maker", 400),
        ShopItem::new("Moonstone Renewer", 2200),
        ShopItem::new("Ardent Censer", 2300),
        ShopItem::new("Staff of Flowing Water", 2300),
        ShopItem::new("Morellonomicon", 2200),
      ],
    }
  }

  /// Nunu (or Draven) running at the enemy nexus with ghost up.
  pub fn disco_nunu() -> Self {
    Self {
      name: "disco-nunu".to_string(),
      lobby: LobbyType::SoloDuo,
      primary_position: Position::Support,
      secondary_position: Position::Bottom,
      bans: vec![ChampionId::LUX],
      picks: vec![ChampionId::NUNU, ChampionId::DRAVEN],
      spell1: SummonerSpell::Ghost,
      spell2: SummonerSpell::Cleanse,
      gameplay: vec![
        GameplayStep::LockCamera,
        GameplayStep::GoToEnemyNexus,
        GameplayStep::use_spell("d"),
        GameplayStep::use_spell("f"),
      ],
      items: Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_presets_resolve_by_name() {
    for name in PRESETS {
      let strategy = BotStrategy::preset(name).unwrap();
      assert_eq!(strategy.name, name);
      assert!(!strategy.picks.is_empty());
    }
    assert!(BotStrategy::preset("teemo").is_none());
  }

  #[test]
  fn test_disco_nunu_falls_back_to_draven() {
    let strategy = BotStrategy::disco_nunu();
    assert_eq!(strategy.picks, vec![ChampionId::NUNU, ChampionId::DRAVEN]);
    assert_eq!(
      (strategy.spell1, strategy.spell2),
      (SummonerSpell::Ghost, SummonerSpell::Cleanse)
    );
  }

  #[test]
  fn test_custom_strategy_decodes() {
    let json = serde_json::json!({
      "name": "sett-top",
      "lobby": "draft_pick",
      "primary_position": "TOP",
      "secondary_position": "JUNGLE",
      "picks": [875],
      "spell1": "flash",
      "spell2": "ignite",
      "gameplay": [ { "step": "go_to_enemy_nexus" } ]
    });
    let strategy: BotStrategy = serde_json::from_value(json).unwrap();
    assert_eq!(strategy.lobby, LobbyType::DraftPick);
    assert_eq!(strategy.picks, vec![ChampionId::SETT]);
    assert!(strategy.bans.is_empty());
    assert!(strategy.items.is_empty());
    assert_eq!(strategy.gameplay, vec![GameplayStep::GoToEnemyNexus]);
  }
}
