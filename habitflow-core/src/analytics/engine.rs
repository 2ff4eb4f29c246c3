//! Habit analytics engine.
//!
//! Pure queries over a [`Snapshot`] of habits and completions: whether a
//! habit is due on a date, whether it was completed, its current streak and
//! its completion rate over a trailing window.
//!
//! Queries never fail. An unknown habit id yields the neutral value for the
//! query (`false`, `0`, an empty list).

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::calendar::{walk_back, weekday_index};
use crate::types::{Frequency, Habit, HabitCompletion};

/// How many dates (including today) the streak walk inspects.
pub const STREAK_LOOKBACK_DAYS: u32 = 365;

/// Whether `habit` is scheduled on `date`.
///
/// Depends only on the habit's schedule and the weekday of `date`. A custom
/// schedule with no days is treated as due every day, so a misconfigured
/// habit stays visible instead of silently disappearing.
pub fn due(habit: &Habit, date: NaiveDate) -> bool {
    let weekday = weekday_index(date);
    match habit.frequency {
        Frequency::Daily => true,
        Frequency::Weekdays => (1..=5).contains(&weekday),
        Frequency::Weekends => weekday == 0 || weekday == 6,
        Frequency::Custom => match habit.custom_days.as_deref() {
            Some(days) if !days.is_empty() => days.contains(&weekday),
            _ => true,
        },
    }
}

/// `round(part / whole * 100)`, half rounding up; 0 when `whole` is 0.
pub fn rounded_percent(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    ((part * 200 + whole) / (2 * whole)) as u8
}

/// An in-memory view of one user's habits and completions.
///
/// Habits keep their insertion (creation) order. Completions are a set: a
/// `(habit_id, date)` pair is either present or not.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    habits: Vec<Habit>,
    completions: HashMap<String, HashSet<NaiveDate>>,
}

impl Snapshot {
    pub fn new(habits: Vec<Habit>, completions: impl IntoIterator<Item = HabitCompletion>) -> Self {
        let mut snapshot = Self {
            habits,
            completions: HashMap::new(),
        };
        for completion in completions {
            snapshot.insert_completion(&completion.habit_id, completion.date);
        }
        snapshot
    }

    /// All habits in creation order.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    /// Number of completion records.
    pub fn completion_count(&self) -> usize {
        self.completions.values().map(HashSet::len).sum()
    }

    /// Whether `habit_id` was completed on `date`.
    pub fn is_completed(&self, habit_id: &str, date: NaiveDate) -> bool {
        self.completions
            .get(habit_id)
            .is_some_and(|dates| dates.contains(&date))
    }

    /// Flip the completion for `(habit_id, date)` and return the new state.
    ///
    /// Removes the record if present, inserts it otherwise. Persisting the
    /// flip is the store's job; see [`crate::HabitSession::toggle_completion`].
    pub fn apply_toggle(&mut self, habit_id: &str, date: NaiveDate) -> bool {
        if self.remove_completion(habit_id, date) {
            false
        } else {
            self.insert_completion(habit_id, date);
            true
        }
    }

    /// Force the completion for `(habit_id, date)` to `done`.
    pub fn set_completed(&mut self, habit_id: &str, date: NaiveDate, done: bool) {
        if done {
            self.insert_completion(habit_id, date);
        } else {
            self.remove_completion(habit_id, date);
        }
    }

    fn insert_completion(&mut self, habit_id: &str, date: NaiveDate) {
        self.completions
            .entry(habit_id.to_string())
            .or_default()
            .insert(date);
    }

    fn remove_completion(&mut self, habit_id: &str, date: NaiveDate) -> bool {
        let Some(dates) = self.completions.get_mut(habit_id) else {
            return false;
        };
        let removed = dates.remove(&date);
        if dates.is_empty() {
            self.completions.remove(habit_id);
        }
        removed
    }

    /// Append a habit (newest last).
    pub fn push_habit(&mut self, habit: Habit) {
        self.habits.push(habit);
    }

    /// Replace the habit with the same id in place, keeping its position.
    pub fn replace_habit(&mut self, habit: Habit) -> bool {
        match self.habits.iter_mut().find(|h| h.id == habit.id) {
            Some(slot) => {
                *slot = habit;
                true
            }
            None => false,
        }
    }

    /// Remove a habit and all of its completions.
    pub fn remove_habit(&mut self, habit_id: &str) -> Option<Habit> {
        let index = self.habits.iter().position(|h| h.id == habit_id)?;
        self.completions.remove(habit_id);
        Some(self.habits.remove(index))
    }

    /// Habits due on `date`, in creation order.
    pub fn habits_for_date(&self, date: NaiveDate) -> Vec<&Habit> {
        self.habits.iter().filter(|h| due(h, date)).collect()
    }

    /// How many of the habits due on `date` are completed on `date`.
    pub fn completed_count(&self, date: NaiveDate) -> usize {
        self.habits_for_date(date)
            .into_iter()
            .filter(|h| self.is_completed(&h.id, date))
            .count()
    }

    /// Current streak ending at `today`.
    ///
    /// Walks back up to [`STREAK_LOOKBACK_DAYS`] dates. Days the habit is not
    /// due on are skipped. A completed due day extends the streak; a missed
    /// due day ends it, except today, which may still be completed.
    pub fn streak(&self, habit_id: &str, today: NaiveDate) -> u32 {
        let Some(habit) = self.habit(habit_id) else {
            return 0;
        };

        let mut streak = 0;
        for (offset, date) in walk_back(today, STREAK_LOOKBACK_DAYS) {
            if !due(habit, date) {
                continue;
            }
            if self.is_completed(habit_id, date) {
                streak += 1;
            } else if offset > 0 {
                break;
            }
        }
        streak
    }

    /// Completion rate (0-100) over the `window_days` dates ending at `today`.
    ///
    /// Only due dates count. Returns 0 when nothing was due in the window.
    /// The window is not clipped to the habit's creation date: days before
    /// the habit existed count as missed.
    pub fn completion_rate(&self, habit_id: &str, window_days: u32, today: NaiveDate) -> u8 {
        let Some(habit) = self.habit(habit_id) else {
            return 0;
        };

        let mut tracked = 0;
        let mut completed = 0;
        for (_, date) in walk_back(today, window_days) {
            if !due(habit, date) {
                continue;
            }
            tracked += 1;
            if self.is_completed(habit_id, date) {
                completed += 1;
            }
        }
        rounded_percent(completed, tracked)
    }
}
