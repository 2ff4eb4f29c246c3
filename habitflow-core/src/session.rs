//! A user's habit session: the in-memory snapshot plus the store behind it.
//!
//! Reads go straight to the snapshot. Writes go to the store first and are
//! applied to the snapshot only once the store accepted them, so a failed
//! write leaves the snapshot untouched and a successful one is visible to the
//! very next query.

use chrono::NaiveDate;

use crate::analytics::Snapshot;
use crate::error::{Error, Result};
use crate::store::HabitStore;
use crate::types::{Habit, HabitUpdate, NewHabit};

pub struct HabitSession<S: HabitStore> {
    store: S,
    snapshot: Snapshot,
}

impl<S: HabitStore> HabitSession<S> {
    /// Load the full snapshot from `store`.
    pub fn open(store: S) -> Result<Self> {
        let snapshot = store.load_snapshot()?;
        tracing::info!(
            habits = snapshot.habits().len(),
            completions = snapshot.completion_count(),
            "Loaded habit snapshot"
        );
        Ok(Self { store, snapshot })
    }

    /// Reload the snapshot from the store, discarding the in-memory copy.
    pub fn refresh(&mut self) -> Result<()> {
        self.snapshot = self.store.load_snapshot()?;
        Ok(())
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Find a habit by exact id, then unique case-insensitive name, then
    /// unique id prefix.
    pub fn lookup(&self, query: &str) -> Result<&Habit> {
        let habits = self.snapshot.habits();

        if let Some(habit) = habits.iter().find(|h| h.id == query) {
            return Ok(habit);
        }

        let wanted = query.to_lowercase();
        let by_name: Vec<&Habit> = habits
            .iter()
            .filter(|h| h.name.to_lowercase() == wanted)
            .collect();
        if let [habit] = by_name.as_slice() {
            return Ok(habit);
        }

        let by_prefix: Vec<&Habit> = habits.iter().filter(|h| h.id.starts_with(query)).collect();
        match by_prefix.as_slice() {
            [habit] if !query.is_empty() => Ok(habit),
            _ => Err(Error::HabitNotFound(query.to_string())),
        }
    }

    pub fn add_habit(&mut self, new: NewHabit) -> Result<Habit> {
        let habit = Habit::create(new)?;
        self.store.insert_habit(&habit)?;
        tracing::info!(habit_id = %habit.id, name = %habit.name, frequency = %habit.frequency, "Habit created");
        self.snapshot.push_habit(habit.clone());
        Ok(habit)
    }

    pub fn update_habit(&mut self, habit_id: &str, update: HabitUpdate) -> Result<Habit> {
        let mut habit = self
            .snapshot
            .habit(habit_id)
            .cloned()
            .ok_or_else(|| Error::HabitNotFound(habit_id.to_string()))?;
        habit.apply_update(update)?;

        self.store.update_habit(&habit)?;
        tracing::info!(habit_id = %habit.id, "Habit updated");
        self.snapshot.replace_habit(habit.clone());
        Ok(habit)
    }

    /// Delete a habit together with its completions.
    pub fn delete_habit(&mut self, habit_id: &str) -> Result<Habit> {
        if self.snapshot.habit(habit_id).is_none() {
            return Err(Error::HabitNotFound(habit_id.to_string()));
        }
        self.store.delete_habit(habit_id)?;
        tracing::info!(habit_id = %habit_id, "Habit deleted");
        self.snapshot
            .remove_habit(habit_id)
            .ok_or_else(|| Error::HabitNotFound(habit_id.to_string()))
    }

    /// Flip the completion for `(habit_id, date)` and return the new state.
    ///
    /// `&mut self` serializes toggles within a session.
    pub fn toggle_completion(&mut self, habit_id: &str, date: NaiveDate) -> Result<bool> {
        if self.snapshot.habit(habit_id).is_none() {
            return Err(Error::HabitNotFound(habit_id.to_string()));
        }

        let done = self.store.apply_toggle(habit_id, date)?;
        self.snapshot.set_completed(habit_id, date, done);
        tracing::debug!(habit_id = %habit_id, date = %date, done, "Completion toggled");
        Ok(done)
    }
}
