//! Cross-habit statistics for the overview screens.
//!
//! Provides the summary numbers, the 7-day completed-count bars and the
//! per-day completion ratio used to shade a month calendar.

use chrono::NaiveDate;
use serde::Serialize;

use super::engine::Snapshot;
use crate::calendar::{last_days, month_days, weekday_index};

/// Completed-habit count for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    /// 0 = Sunday
    pub weekday: u8,
    pub completed: usize,
}

/// `completed_count` for each of the last 7 days, oldest first.
pub fn weekly_completed_counts(snapshot: &Snapshot, today: NaiveDate) -> Vec<DayCount> {
    last_days(today, 7)
        .into_iter()
        .map(|date| DayCount {
            date,
            weekday: weekday_index(date),
            completed: snapshot.completed_count(date),
        })
        .collect()
}

/// Fraction (0.0-1.0) of the habits due on `date` that were completed.
///
/// 0.0 when no habit is due.
pub fn day_completion_ratio(snapshot: &Snapshot, date: NaiveDate) -> f64 {
    let due = snapshot.habits_for_date(date).len();
    if due == 0 {
        return 0.0;
    }
    snapshot.completed_count(date) as f64 / due as f64
}

/// One day of a month overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub due: usize,
    pub completed: usize,
    pub ratio: f64,
}

/// Progress for every day of a month.
pub fn month_progress(snapshot: &Snapshot, year: i32, month: u32) -> Vec<DayProgress> {
    month_days(year, month)
        .into_iter()
        .map(|date| DayProgress {
            date,
            due: snapshot.habits_for_date(date).len(),
            completed: snapshot.completed_count(date),
            ratio: day_completion_ratio(snapshot, date),
        })
        .collect()
}

/// Streak and rate for one habit.
#[derive(Debug, Clone, Serialize)]
pub struct HabitSummary {
    pub id: String,
    pub name: String,
    pub streak: u32,
    pub rate: u8,
}

/// Summary numbers across all habits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    /// The day the stats are anchored to
    pub today: Option<NaiveDate>,
    /// Window used for the rates
    pub window_days: u32,
    /// Rounded mean of every habit's completion rate
    pub total_rate: u8,
    /// Highest current streak among all habits
    pub best_streak: u32,
    /// Number of habits
    pub active_habits: usize,
    /// Habits completed today (among those due)
    pub today_done: usize,
    /// Habits due today
    pub today_total: usize,
    /// Completed counts for the last 7 days, oldest first
    pub weekly: Vec<DayCount>,
    /// Per-habit numbers, in creation order
    pub habits: Vec<HabitSummary>,
}

impl DashboardStats {
    pub fn compute(snapshot: &Snapshot, today: NaiveDate, window_days: u32) -> Self {
        let weekly = weekly_completed_counts(snapshot, today);
        if snapshot.habits().is_empty() {
            return Self {
                today: Some(today),
                window_days,
                weekly,
                ..Default::default()
            };
        }

        let habits: Vec<HabitSummary> = snapshot
            .habits()
            .iter()
            .map(|h| HabitSummary {
                id: h.id.clone(),
                name: h.name.clone(),
                streak: snapshot.streak(&h.id, today),
                rate: snapshot.completion_rate(&h.id, window_days, today),
            })
            .collect();

        let rate_sum: u32 = habits.iter().map(|h| u32::from(h.rate)).sum();
        let count = habits.len() as u32;
        let total_rate = ((rate_sum * 2 + count) / (2 * count)) as u8;
        let best_streak = habits.iter().map(|h| h.streak).max().unwrap_or(0);

        let stats = Self {
            today: Some(today),
            window_days,
            total_rate,
            best_streak,
            active_habits: habits.len(),
            today_done: snapshot.completed_count(today),
            today_total: snapshot.habits_for_date(today).len(),
            weekly,
            habits,
        };

        tracing::debug!(
            active_habits = stats.active_habits,
            total_rate = stats.total_rate,
            best_streak = stats.best_streak,
            "Computed dashboard stats"
        );

        stats
    }

    /// Tallest bar in the weekly chart (at least 1, for scaling).
    pub fn weekly_max(&self) -> usize {
        self.weekly.iter().map(|d| d.completed).max().unwrap_or(0).max(1)
    }

    /// Today's progress as "done/total".
    pub fn format_today(&self) -> String {
        format!("{}/{}", self.today_done, self.today_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{days_before, parse_date};
    use crate::types::{Frequency, Habit, HabitCompletion, NewHabit};
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn habit(id: &str, frequency: Frequency) -> Habit {
        Habit::create_at(
            NewHabit::named(id).with_frequency(frequency),
            id.to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_dashboard() {
        let stats = DashboardStats::compute(&Snapshot::default(), date("2024-06-03"), 30);
        assert_eq!(stats.total_rate, 0);
        assert_eq!(stats.best_streak, 0);
        assert_eq!(stats.active_habits, 0);
        assert_eq!(stats.format_today(), "0/0");
        assert_eq!(stats.weekly.len(), 7);
        assert_eq!(stats.weekly_max(), 1);
    }

    #[test]
    fn test_dashboard_aggregates() {
        let today = date("2024-06-03"); // Monday
        let mut completions: Vec<_> = (0..7)
            .map(|i| HabitCompletion::new("daily", days_before(today, i)))
            .collect();
        completions.push(HabitCompletion::new("weekend", date("2024-06-01")));

        let snapshot = Snapshot::new(
            vec![
                habit("daily", Frequency::Daily),
                habit("weekend", Frequency::Weekends),
            ],
            completions,
        );

        let stats = DashboardStats::compute(&snapshot, today, 7);
        assert_eq!(stats.active_habits, 2);
        assert_eq!(stats.today_total, 1);
        assert_eq!(stats.today_done, 1);
        assert_eq!(stats.best_streak, 7);
        // daily 100%, weekend 1 of 2 = 50% -> mean 75
        assert_eq!(stats.habits[0].rate, 100);
        assert_eq!(stats.habits[1].rate, 50);
        assert_eq!(stats.total_rate, 75);
        // Saturday the 1st: both habits completed
        assert_eq!(stats.weekly[4].date, date("2024-06-01"));
        assert_eq!(stats.weekly[4].completed, 2);
        assert_eq!(stats.weekly_max(), 2);
    }

    #[test]
    fn test_day_completion_ratio() {
        let monday = date("2024-06-03");
        let snapshot = Snapshot::new(
            vec![
                habit("a", Frequency::Daily),
                habit("b", Frequency::Weekdays),
                habit("c", Frequency::Weekends),
            ],
            vec![HabitCompletion::new("a", monday)],
        );
        assert_eq!(day_completion_ratio(&snapshot, monday), 0.5);

        let empty = Snapshot::new(vec![habit("c", Frequency::Weekends)], vec![]);
        assert_eq!(day_completion_ratio(&empty, monday), 0.0);
    }

    #[test]
    fn test_month_progress_covers_month() {
        let snapshot = Snapshot::new(
            vec![habit("a", Frequency::Weekdays)],
            vec![HabitCompletion::new("a", date("2024-02-29"))],
        );
        let days = month_progress(&snapshot, 2024, 2);
        assert_eq!(days.len(), 29);
        let leap_day = days.last().unwrap();
        assert_eq!(leap_day.due, 1);
        assert_eq!(leap_day.completed, 1);
        assert_eq!(leap_day.ratio, 1.0);
    }
}
