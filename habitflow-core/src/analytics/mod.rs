//! Analytics module for habitflow
//!
//! Provides:
//! - The habit analytics engine: due dates, completion lookup, streaks and
//!   completion rates over a [`Snapshot`]
//! - Per-habit breakdowns (weekly, monthly and yearly views)
//! - Cross-habit dashboard statistics
//!
//! All queries are pure functions of the snapshot and an explicit `today`,
//! so they can be called from any thread and tested without a store.

pub mod breakdown;
pub mod dashboard;
pub mod engine;

pub use breakdown::{
    month_calendar, month_week_breakdown, weekly_series, year_heatmap, year_month_rates,
    CalendarDay, DayMark, HeatCell, HeatmapMonth, MonthCalendar, PeriodTally,
};
pub use dashboard::{
    day_completion_ratio, month_progress, weekly_completed_counts, DashboardStats, DayCount,
    DayProgress, HabitSummary,
};
pub use engine::{due, rounded_percent, Snapshot, STREAK_LOOKBACK_DAYS};
