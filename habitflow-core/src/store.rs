//! Store adapter contract.
//!
//! The analytics engine only reads snapshots. Anything that persists habits
//! and completions (the bundled SQLite [`Database`](crate::Database), or a
//! remote service) implements [`HabitStore`] so a
//! [`HabitSession`](crate::HabitSession) can load from it and delegate
//! writes to it.

use chrono::NaiveDate;

use crate::analytics::Snapshot;
use crate::error::Result;
use crate::types::{Habit, HabitCompletion};

/// Persistence for habits and completions.
pub trait HabitStore {
    /// All habits in creation order.
    fn load_habits(&self) -> Result<Vec<Habit>>;

    /// All completion records.
    fn load_completions(&self) -> Result<Vec<HabitCompletion>>;

    fn insert_habit(&self, habit: &Habit) -> Result<()>;

    /// Overwrite the mutable fields of an existing habit.
    ///
    /// Returns `Error::HabitNotFound` when no habit has that id.
    fn update_habit(&self, habit: &Habit) -> Result<()>;

    /// Delete a habit and its completions. Returns whether it existed.
    fn delete_habit(&self, habit_id: &str) -> Result<bool>;

    /// Flip the completion for `(habit_id, date)` atomically.
    ///
    /// Returns the new state (`true` = completed).
    fn apply_toggle(&self, habit_id: &str, date: NaiveDate) -> Result<bool>;

    /// Load a full snapshot.
    fn load_snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot::new(self.load_habits()?, self.load_completions()?))
    }
}
