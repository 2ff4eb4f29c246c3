//! Core domain types for habitflow
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A user-defined recurring activity with a schedule ([`Frequency`]) |
//! | **Completion** | A habit marked done for a whole calendar day |
//! | **Due** | A habit is due on a date when its schedule includes that weekday |
//!
//! Weekdays are indexed `0 = Sunday .. 6 = Saturday` everywhere.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================
// Frequency
// ============================================

/// On which weekdays a habit is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day
    #[default]
    Daily,
    /// Monday through Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
    /// Only the weekdays listed in `Habit::custom_days`
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekdays => "weekdays",
            Frequency::Weekends => "weekends",
            Frequency::Custom => "custom",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekdays => "Weekdays",
            Frequency::Weekends => "Weekends",
            Frequency::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekdays" => Ok(Frequency::Weekdays),
            "weekends" => Ok(Frequency::Weekends),
            "custom" => Ok(Frequency::Custom),
            _ => Err(format!("unknown frequency: {}", s)),
        }
    }
}

// ============================================
// Habit
// ============================================

/// A recurring activity the user tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Opaque unique identifier, immutable once assigned
    pub id: String,
    /// Display label
    pub name: String,
    /// Display color (e.g. "#4CAF50")
    pub color: String,
    /// Display icon name
    pub icon: String,
    /// Schedule
    pub frequency: Frequency,
    /// Weekday indices for [`Frequency::Custom`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_days: Option<Vec<u8>>,
    /// Creation timestamp (informational only)
    pub created_at: DateTime<Utc>,
    /// Optional reminder time ("HH:MM")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
}

impl Habit {
    /// Build a habit from user input, assigning a fresh id and creation time.
    pub fn create(new: NewHabit) -> Result<Self> {
        Self::create_at(new, uuid::Uuid::new_v4().to_string(), Utc::now())
    }

    /// Like [`Habit::create`] with an explicit id and timestamp.
    pub fn create_at(new: NewHabit, id: String, created_at: DateTime<Utc>) -> Result<Self> {
        let name = validate_name(&new.name)?;
        let custom_days = normalize_custom_days(new.frequency, new.custom_days)?;
        if new.frequency == Frequency::Custom && custom_days.is_none() {
            return Err(Error::InvalidHabit(
                "a custom schedule needs at least one weekday".to_string(),
            ));
        }

        Ok(Self {
            id,
            name,
            color: new.color,
            icon: new.icon,
            frequency: new.frequency,
            custom_days,
            created_at,
            reminder: new.reminder,
        })
    }

    /// Apply a partial update, re-normalizing the schedule.
    ///
    /// `id` and `created_at` never change.
    pub fn apply_update(&mut self, update: HabitUpdate) -> Result<()> {
        let mut next = self.clone();

        if let Some(name) = update.name {
            next.name = validate_name(&name)?;
        }
        if let Some(color) = update.color {
            next.color = color;
        }
        if let Some(icon) = update.icon {
            next.icon = icon;
        }
        if let Some(reminder) = update.reminder {
            next.reminder = reminder;
        }

        if update.frequency.is_some() || update.custom_days.is_some() {
            let frequency = update.frequency.unwrap_or(next.frequency);
            let days = match update.custom_days {
                Some(days) => Some(days),
                // Keep the existing selection when only the frequency changes
                None => next.custom_days.take(),
            };
            let days = normalize_custom_days(frequency, days)?;
            if frequency == Frequency::Custom && days.is_none() {
                return Err(Error::InvalidHabit(
                    "a custom schedule needs at least one weekday".to_string(),
                ));
            }
            next.frequency = frequency;
            next.custom_days = days;
        }

        *self = next;
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidHabit("name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Keep custom days only for custom schedules, sorted and deduplicated.
///
/// An empty selection collapses to `None`.
fn normalize_custom_days(frequency: Frequency, days: Option<Vec<u8>>) -> Result<Option<Vec<u8>>> {
    if frequency != Frequency::Custom {
        return Ok(None);
    }
    let Some(mut days) = days else {
        return Ok(None);
    };
    if let Some(bad) = days.iter().find(|&&d| d > 6) {
        return Err(Error::InvalidHabit(format!(
            "weekday index {} out of range 0-6",
            bad
        )));
    }
    days.sort_unstable();
    days.dedup();
    Ok(if days.is_empty() { None } else { Some(days) })
}

/// User input for creating a habit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub frequency: Frequency,
    pub custom_days: Option<Vec<u8>>,
    pub reminder: Option<String>,
}

impl NewHabit {
    /// A daily habit with default display metadata.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: "#4CAF50".to_string(),
            icon: "check".to_string(),
            ..Default::default()
        }
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_custom_days(mut self, days: Vec<u8>) -> Self {
        self.frequency = Frequency::Custom;
        self.custom_days = Some(days);
        self
    }
}

/// Partial update for an existing habit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub frequency: Option<Frequency>,
    pub custom_days: Option<Vec<u8>>,
    /// `Some(None)` clears the reminder
    pub reminder: Option<Option<String>>,
}

impl HabitUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.color.is_none()
            && self.icon.is_none()
            && self.frequency.is_none()
            && self.custom_days.is_none()
            && self.reminder.is_none()
    }
}

// ============================================
// Completion
// ============================================

/// A habit marked done for a whole calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub habit_id: String,
    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

impl HabitCompletion {
    pub fn new(habit_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
        }
    }
}
