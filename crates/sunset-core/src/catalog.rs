//! Static game content: daily tasks, hidden-room puzzles, and lore.
//!
//! Built once from [`GameConfig`] and read-only afterwards. The puzzle
//! ledger takes its lore rewards from here, and the task board looks up
//! the task to present for a given day and difficulty.

use std::collections::BTreeMap;

use sunset_types::{Day, LoreId, PuzzleId, TaskDifficulty, TaskId};
use tracing::warn;

use crate::config::GameConfig;

/// A task the player can be given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContent {
    /// Unique task identifier.
    pub id: TaskId,
    /// Day the task belongs to.
    pub day: Day,
    /// Difficulty bucket.
    pub difficulty: TaskDifficulty,
    /// Display name.
    pub name: String,
    /// Instructions text.
    pub instructions: String,
}

/// A hidden-room puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleContent {
    /// Unique puzzle identifier.
    pub id: PuzzleId,
    /// Display name.
    pub name: String,
    /// Lore unlocked on completion.
    pub lore_reward: Option<LoreId>,
}

/// A lore entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoreEntry {
    /// Unique lore identifier.
    pub id: LoreId,
    /// Title.
    pub title: String,
    /// Short preview.
    pub preview: String,
    /// Day the entry relates to, if any.
    pub day: Option<Day>,
}

/// All static content, indexed for lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCatalog {
    tasks: Vec<TaskContent>,
    puzzles: BTreeMap<PuzzleId, PuzzleContent>,
    lore: BTreeMap<LoreId, LoreEntry>,
}

impl ContentCatalog {
    /// Index the content sections of `config`.
    ///
    /// Tasks with a day outside `1..=5` and entries with blank ids are
    /// skipped with a warning. A later duplicate id replaces an earlier one.
    pub fn from_config(config: &GameConfig) -> Self {
        let mut catalog = Self::default();

        for task in &config.tasks {
            let Some(day) = Day::new(task.day) else {
                warn!(task_id = %task.id, day = task.day, "Task day out of range, skipping");
                continue;
            };
            let id = TaskId::new(task.id.as_str());
            if id.is_blank() {
                warn!(day = %day, "Task with blank id, skipping");
                continue;
            }
            catalog.tasks.push(TaskContent {
                id,
                day,
                difficulty: task.difficulty,
                name: task.name.clone(),
                instructions: task.instructions.clone(),
            });
        }

        for puzzle in &config.puzzles {
            let id = PuzzleId::new(puzzle.id.as_str());
            if id.is_blank() {
                warn!("Puzzle with blank id, skipping");
                continue;
            }
            let lore_reward = puzzle.lore.as_ref().and_then(|lore| {
                let lore_id = LoreId::new(lore.id.as_str());
                if lore_id.is_blank() {
                    return None;
                }
                catalog.lore.insert(
                    lore_id.clone(),
                    LoreEntry {
                        id: lore_id.clone(),
                        title: lore.title.clone(),
                        preview: lore.preview.clone(),
                        day: Day::new(lore.day),
                    },
                );
                Some(lore_id)
            });
            catalog.puzzles.insert(
                id.clone(),
                PuzzleContent {
                    id,
                    name: puzzle.name.clone(),
                    lore_reward,
                },
            );
        }

        tracing::debug!(
            tasks = catalog.tasks.len(),
            puzzles = catalog.puzzles.len(),
            lore = catalog.lore.len(),
            "Content catalog built"
        );
        catalog
    }

    /// The task for `day` at `difficulty`, the first configured one if
    /// several match.
    pub fn task_for(&self, day: Day, difficulty: TaskDifficulty) -> Option<&TaskContent> {
        self.tasks
            .iter()
            .find(|task| task.day == day && task.difficulty == difficulty)
    }

    /// Look up a puzzle.
    pub fn puzzle(&self, puzzle_id: &PuzzleId) -> Option<&PuzzleContent> {
        self.puzzles.get(puzzle_id)
    }

    /// Look up a lore entry.
    pub fn lore(&self, lore_id: &LoreId) -> Option<&LoreEntry> {
        self.lore.get(lore_id)
    }

    /// Every (puzzle, lore) reward pair.
    pub fn lore_rewards(&self) -> impl Iterator<Item = (PuzzleId, LoreId)> + '_ {
        self.puzzles.values().filter_map(|puzzle| {
            puzzle
                .lore_reward
                .clone()
                .map(|lore_id| (puzzle.id.clone(), lore_id))
        })
    }

    /// Number of tasks indexed.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
