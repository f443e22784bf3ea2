// Champion select turn resolution: which cell is ours, what to put on it, and committing it

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::client::{CommitStatus, GameClient};
use super::types::{ActionCell, ActionKind, ChampSelectSession, ChampionId};
use crate::error::LcuError;

/// What happened when the local player's turn was resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
  /// The cell was staged and confirmed.
  Committed { action_id: i64, champion: ChampionId },
  /// A commit was attempted but the client rejected or dropped one of the steps. The next poll
  /// re-reads the session and picks up from the staged state.
  CommitFailed {
    action_id: i64,
    champion: ChampionId,
    reason: String,
  },
  /// Nothing in the priority list is available. For bans this counts as done, for picks it is
  /// a dodge.
  NoCandidate,
  /// No pending cell of this kind belongs to the local player right now.
  NotMyTurn,
}

impl TurnOutcome {
  /// Whether the once-per-match ban attempt is used up. A failed commit leaves it open so the
  /// next poll can finish the staged ban.
  pub fn settles_ban(&self) -> bool {
    matches!(self, Self::Committed { .. } | Self::NoCandidate)
  }
}

/// First entry of `priority` present in `available`.
pub fn select_candidate(priority: &[ChampionId], available: &[ChampionId]) -> Option<ChampionId> {
  priority
    .iter()
    .copied()
    .find(|champion| available.contains(champion))
}

/// First pending cell of `kind` owned by the local player, in document order. Cells whose
/// commit was already confirmed this match are skipped even if this snapshot predates it.
pub fn find_actionable_cell<'a>(
  session: &'a ChampSelectSession,
  kind: ActionKind,
  confirmed: &HashSet<i64>,
) -> Option<&'a ActionCell> {
  session.actions.iter().flatten().find(|cell| {
    cell.actor_cell_id == session.local_player_cell_id
      && !cell.completed
      && cell.kind == kind
      && !confirmed.contains(&cell.id)
  })
}

/// Resolves the local player's `kind` turn against `session`: choose a candidate, find our
/// cell, then stage and confirm exactly once. `confirmed` collects action ids committed this
/// match.
pub async fn resolve_turn(
  client: &GameClient,
  session: &ChampSelectSession,
  priority: &[ChampionId],
  kind: ActionKind,
  confirmed: &mut HashSet<i64>,
) -> Result<TurnOutcome, LcuError> {
  let available = client.available_champions(kind.into()).await?;
  let Some(champion) = select_candidate(priority, &available) else {
    match kind {
      ActionKind::Ban => info!("No champion from the ban list is bannable, skipping ban"),
      _ => info!("Dodging Champion select. Desired champion unavailable"),
    }
    return Ok(TurnOutcome::NoCandidate);
  };

  let Some(cell) = find_actionable_cell(session, kind, confirmed) else {
    debug!("Not our {} turn yet", kind);
    return Ok(TurnOutcome::NotMyTurn);
  };

  match kind {
    ActionKind::Ban => info!("Banning {}", champion),
    _ => info!("Picking {}", champion),
  }

  let action_id = cell.id;
  match client.complete_action(cell, champion).await {
    Ok(CommitStatus::Confirmed) => {
      confirmed.insert(action_id);
      Ok(TurnOutcome::Committed {
        action_id,
        champion,
      })
    }
    Ok(CommitStatus::Rejected { step, status }) => Ok(TurnOutcome::CommitFailed {
      action_id,
      champion,
      reason: format!("{:?} step returned status {}", step, status),
    }),
    Err(LcuError::Cancelled) => Err(LcuError::Cancelled),
    Err(e) => {
      warn!("Commit of action {} failed: {}", action_id, e);
      Ok(TurnOutcome::CommitFailed {
        action_id,
        champion,
        reason: e.to_string(),
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lcu::types::{ChampSelectTimer, TimerPhase};

  fn cell(id: i64, actor: i64, kind: ActionKind, completed: bool) -> ActionCell {
    ActionCell {
      id,
      actor_cell_id: actor,
      kind,
      completed,
      champion_id: ChampionId::NONE,
    }
  }

  fn session(actions: Vec<Vec<ActionCell>>) -> ChampSelectSession {
    ChampSelectSession {
      local_player_cell_id: 7,
      timer: ChampSelectTimer {
        phase: TimerPhase::BanPick,
      },
      actions,
    }
  }

  #[test]
  fn test_select_candidate_first_available_wins() {
    let a = ChampionId(1);
    let b = ChampionId(2);
    let c = ChampionId(3);

    assert_eq!(select_candidate(&[a, b, c], &[b]), Some(b));
    assert_eq!(select_candidate(&[a, b, c], &[c, b]), Some(b));
    assert_eq!(select_candidate(&[a, b, c], &[]), None);
    assert_eq!(select_candidate(&[], &[a, b]), None);
  }

  #[test]
  fn test_find_cell_ignores_other_players_and_completed_cells() {
    let s = session(vec![
      vec![
        cell(1, 3, ActionKind::Ban, false),
        cell(2, 7, ActionKind::Ban, true),
      ],
      vec![cell(3, 7, ActionKind::Pick, false)],
    ]);
    let none = HashSet::new();

    assert!(find_actionable_cell(&s, ActionKind::Ban, &none).is_none());
    assert_eq!(
      find_actionable_cell(&s, ActionKind::Pick, &none).map(|c| c.id),
      Some(3)
    );
  }

  #[test]
  fn test_find_cell_document_order() {
    let s = session(vec![
      vec![cell(10, 7, ActionKind::Pick, false)],
      vec![cell(11, 7, ActionKind::Pick, false)],
    ]);
    assert_eq!(
      find_actionable_cell(&s, ActionKind::Pick, &HashSet::new()).map(|c| c.id),
      Some(10)
    );
  }

  #[test]
  fn test_find_cell_skips_confirmed_ids() {
    let s = session(vec![vec![cell(4, 7, ActionKind::Pick, false)]]);
    let confirmed: HashSet<i64> = [4].into_iter().collect();
    assert!(find_actionable_cell(&s, ActionKind::Pick, &confirmed).is_none());
  }

  #[test]
  fn test_settles_ban() {
    assert!(TurnOutcome::NoCandidate.settles_ban());
    assert!(TurnOutcome::Committed {
      action_id: 1,
      champion: ChampionId::LUX
    }
    .settles_ban());
    assert!(!TurnOutcome::NotMyTurn.settles_ban());
    assert!(!TurnOutcome::CommitFailed {
      action_id: 1,
      champion: ChampionId::LUX,
      reason: "Confirm step returned status 500".to_string(),
    }
    .settles_ban());
  }
}
