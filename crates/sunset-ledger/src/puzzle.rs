//! Solved puzzles and the lore they unlock.

use std::collections::{BTreeMap, BTreeSet};

use sunset_events::EventSink;
use sunset_types::{GameEvent, LoreId, PuzzleId};
use tracing::{debug, info, warn};

use crate::LedgerError;

/// Completed puzzle ids and unlocked lore ids.
///
/// Both sets only grow during play. A puzzle may carry a lore reward, which
/// is unlocked in the same operation that completes the puzzle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleLedger {
    /// Puzzles solved so far.
    completed: BTreeSet<PuzzleId>,
    /// Lore unlocked so far.
    unlocked_lore: BTreeSet<LoreId>,
    /// Lore granted when a given puzzle is solved.
    rewards: BTreeMap<PuzzleId, LoreId>,
}

impl PuzzleLedger {
    /// An empty ledger with no lore rewards.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty ledger that unlocks the mapped lore when a puzzle is solved.
    pub fn with_rewards(rewards: impl IntoIterator<Item = (PuzzleId, LoreId)>) -> Self {
        Self {
            rewards: rewards.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Clear progress. Lore rewards are configuration and are kept.
    pub fn reset(&mut self) {
        self.completed.clear();
        self.unlocked_lore.clear();
        info!("Puzzle ledger reset");
    }

    /// Mark a puzzle solved.
    ///
    /// Blank ids and puzzles already solved are rejected. Any lore reward is
    /// unlocked first, then [`GameEvent::PuzzleCompleted`] is emitted.
    pub fn complete(&mut self, puzzle_id: &PuzzleId, sink: &mut impl EventSink) -> Result<(), LedgerError> {
        if puzzle_id.is_blank() {
            warn!("Rejected blank puzzle id");
            return Err(LedgerError::BlankPuzzleId);
        }
        if self.completed.contains(puzzle_id) {
            warn!(puzzle_id = %puzzle_id, "Puzzle already completed");
            return Err(LedgerError::PuzzleAlreadyCompleted {
                puzzle_id: puzzle_id.clone(),
            });
        }

        self.completed.insert(puzzle_id.clone());
        info!(puzzle_id = %puzzle_id, "Puzzle completed");

        if let Some(lore_id) = self.rewards.get(puzzle_id).cloned() {
            self.unlock_lore(lore_id, sink);
        }
        sink.emit(GameEvent::PuzzleCompleted {
            puzzle_id: puzzle_id.clone(),
        });
        Ok(())
    }

    /// Unlock a lore entry. Returns `false` (and emits nothing) if it was
    /// already unlocked or the id is blank.
    pub fn unlock_lore(&mut self, lore_id: LoreId, sink: &mut impl EventSink) -> bool {
        if lore_id.is_blank() || self.unlocked_lore.contains(&lore_id) {
            debug!(lore_id = %lore_id, "Lore not unlocked");
            return false;
        }
        info!(lore_id = %lore_id, "Lore unlocked");
        self.unlocked_lore.insert(lore_id.clone());
        sink.emit(GameEvent::LoreUnlocked { lore_id });
        true
    }

    /// Whether `puzzle_id` has been solved.
    pub fn is_completed(&self, puzzle_id: &PuzzleId) -> bool {
        self.completed.contains(puzzle_id)
    }

    /// Whether `lore_id` has been unlocked.
    pub fn is_lore_unlocked(&self, lore_id: &LoreId) -> bool {
        self.unlocked_lore.contains(lore_id)
    }

    /// Lore granted by solving `puzzle_id`, if any.
    pub fn lore_reward(&self, puzzle_id: &PuzzleId) -> Option<&LoreId> {
        self.rewards.get(puzzle_id)
    }

    /// Copy of the solved puzzle ids.
    pub fn completed_puzzles(&self) -> BTreeSet<PuzzleId> {
        self.completed.clone()
    }

    /// Copy of the unlocked lore ids.
    pub fn unlocked_lore(&self) -> BTreeSet<LoreId> {
        self.unlocked_lore.clone()
    }

    /// Replace the solved set without emitting events. Used by load.
    pub fn set_completed_puzzles(&mut self, completed: BTreeSet<PuzzleId>) {
        self.completed = completed;
    }

    /// Replace the unlocked lore set without emitting events. Used by load.
    pub fn set_unlocked_lore(&mut self, unlocked: BTreeSet<LoreId>) {
        self.unlocked_lore = unlocked;
    }
}
