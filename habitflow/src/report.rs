//! Terminal and JSON rendering for the CLI.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use habitflow_core::analytics::{
    month_calendar, month_progress, month_week_breakdown, weekly_series, year_heatmap,
    year_month_rates, DashboardStats, PeriodTally,
};
use habitflow_core::calendar::{format_date, month_short_name, weekday_index, weekday_short_name};
use habitflow_core::{Frequency, Habit, Snapshot};

const RULE_WIDTH: usize = 48;
const BAR_WIDTH: usize = 20;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HabitView {
    Weekly,
    Monthly,
    Yearly,
}

impl HabitView {
    /// Completion-rate window shown alongside the view.
    fn window_days(self) -> u32 {
        match self {
            HabitView::Weekly => 7,
            HabitView::Monthly => 30,
            HabitView::Yearly => 365,
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn header(title: &str) {
    println!();
    println!("{}", title);
    println!("{}", "─".repeat(RULE_WIDTH));
}

fn bar(percent: u8) -> String {
    let filled = (percent as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// First 8 characters of an id.
fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(end, _)| &id[..end])
}

/// "Daily", or "Custom (Sun, Wed)" for a custom schedule.
fn schedule_label(habit: &Habit) -> String {
    match (&habit.frequency, &habit.custom_days) {
        (Frequency::Custom, Some(days)) => {
            let names: Vec<_> = days.iter().map(|d| weekday_short_name(*d)).collect();
            format!("{} ({})", habit.frequency.label(), names.join(", "))
        }
        (frequency, _) => frequency.label().to_string(),
    }
}

pub fn print_habit_saved(action: &str, habit: &Habit, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(habit)?),
        OutputFormat::Text => {
            println!(
                "{} habit '{}' [{}] - {}",
                action,
                habit.name,
                short_id(&habit.id),
                schedule_label(habit)
            );
            Ok(())
        }
    }
}

pub fn print_list(snapshot: &Snapshot, today: NaiveDate, format: OutputFormat) -> Result<()> {
    let habits = snapshot.habits();

    if format == OutputFormat::Json {
        let rows: Vec<_> = habits
            .iter()
            .map(|h| {
                serde_json::json!({
                    "habit": h,
                    "streak": snapshot.streak(&h.id, today),
                })
            })
            .collect();
        return print_json(&serde_json::Value::Array(rows));
    }

    if habits.is_empty() {
        println!("No habits yet.");
        println!("Run 'habitflow add <name>' to create one.");
        return Ok(());
    }

    header(&format!("Habits ({})", habits.len()));
    for habit in habits {
        let reminder = habit
            .reminder
            .as_deref()
            .map(|r| format!("  ⏰ {}", r))
            .unwrap_or_default();
        println!(
            "  {}  {:<24} {:<22} streak {}{}",
            short_id(&habit.id),
            habit.name,
            schedule_label(habit),
            snapshot.streak(&habit.id, today),
            reminder
        );
    }
    println!();
    Ok(())
}

pub fn print_toggle(
    snapshot: &Snapshot,
    habit_id: &str,
    date: NaiveDate,
    done: bool,
    today: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let streak = snapshot.streak(habit_id, today);
    let name = snapshot.habit(habit_id).map(|h| h.name.as_str()).unwrap_or(habit_id);

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "habit_id": habit_id,
            "date": format_date(date),
            "completed": done,
            "streak": streak,
        })),
        OutputFormat::Text => {
            let state = if done { "✓ done" } else { "○ not done" };
            println!("{} on {}: {}  (streak {})", name, format_date(date), state, streak);
            Ok(())
        }
    }
}

pub fn print_day(snapshot: &Snapshot, date: NaiveDate, format: OutputFormat) -> Result<()> {
    let due = snapshot.habits_for_date(date);
    let done = snapshot.completed_count(date);

    if format == OutputFormat::Json {
        let rows: Vec<_> = due
            .iter()
            .map(|h| {
                serde_json::json!({
                    "id": h.id,
                    "name": h.name,
                    "completed": snapshot.is_completed(&h.id, date),
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "date": format_date(date),
            "completed": done,
            "total": due.len(),
            "habits": rows,
        }));
    }

    header(&format!(
        "{} {}  ({}/{})",
        weekday_short_name(weekday_index(date)),
        format_date(date),
        done,
        due.len()
    ));
    if due.is_empty() {
        println!("  Nothing scheduled.");
    }
    for habit in due {
        let mark = if snapshot.is_completed(&habit.id, date) {
            "[x]"
        } else {
            "[ ]"
        };
        println!("  {} {}", mark, habit.name);
    }
    println!();
    Ok(())
}

pub fn print_habit_detail(
    snapshot: &Snapshot,
    habit: &Habit,
    view: HabitView,
    today: NaiveDate,
    format: OutputFormat,
) -> Result<()> {
    let streak = snapshot.streak(&habit.id, today);
    let window = view.window_days();
    let rate = snapshot.completion_rate(&habit.id, window, today);
    let done_today = snapshot.is_completed(&habit.id, today);

    if format == OutputFormat::Json {
        let detail = match view {
            HabitView::Weekly => serde_json::json!({
                "days": weekly_series(snapshot, habit, today),
            }),
            HabitView::Monthly => serde_json::json!({
                "calendar": month_calendar(snapshot, habit, today.year(), today.month()),
                "weeks": month_week_breakdown(snapshot, habit, today.year(), today.month()),
            }),
            HabitView::Yearly => serde_json::json!({
                "months": year_month_rates(snapshot, habit, today.year()),
                "heatmap": year_heatmap(snapshot, habit, today.year()),
            }),
        };
        return print_json(&serde_json::json!({
            "habit": habit,
            "today": format_date(today),
            "completed_today": done_today,
            "streak": streak,
            "window_days": window,
            "completion_rate": rate,
            "view": detail,
        }));
    }

    header(&habit.name);
    println!("   Schedule: {}", schedule_label(habit));
    if let Some(reminder) = &habit.reminder {
        println!("   Reminder: {}", reminder);
    }
    println!(
        "   Streak:   {:<12} Today: {}",
        streak,
        if done_today { "done" } else { "not done" }
    );
    println!("   Rate:     {:>3}% over {} days", rate, window);
    println!();

    match view {
        HabitView::Weekly => print_weekly(snapshot, habit, today),
        HabitView::Monthly => print_monthly(snapshot, habit, today),
        HabitView::Yearly => print_yearly(snapshot, habit, today),
    }
    println!();
    Ok(())
}

fn print_weekly(snapshot: &Snapshot, habit: &Habit, today: NaiveDate) {
    let days = weekly_series(snapshot, habit, today);
    let names: Vec<_> = days
        .iter()
        .map(|d| format!("{:<4}", weekday_short_name(d.weekday)))
        .collect();
    let marks: Vec<_> = days
        .iter()
        .map(|d| {
            let mark = match (d.done, d.due) {
                (true, _) => "●",
                (false, true) => "○",
                (false, false) => "·",
            };
            format!("{:<4}", mark)
        })
        .collect();
    println!("   {}", names.concat().trim_end());
    println!("   {}", marks.concat().trim_end());
}

fn print_monthly(snapshot: &Snapshot, habit: &Habit, today: NaiveDate) {
    let calendar = month_calendar(snapshot, habit, today.year(), today.month());
    println!("   {} {}", month_short_name(calendar.month), calendar.year);
    let names: Vec<_> = (0..7)
        .map(|i| format!("{:>4}", &weekday_short_name(i)[..2]))
        .collect();
    println!("  {}", names.concat());
    for row in calendar.rows() {
        let cells: Vec<_> = row
            .iter()
            .map(|cell| match cell {
                Some(day) if day.done => format!("{:>3}*", day.day),
                Some(day) => format!("{:>3} ", day.day),
                None => "    ".to_string(),
            })
            .collect();
        println!("  {}", cells.concat().trim_end());
    }
    println!();
    print_tallies(&month_week_breakdown(
        snapshot,
        habit,
        today.year(),
        today.month(),
    ));
}

fn print_yearly(snapshot: &Snapshot, habit: &Habit, today: NaiveDate) {
    let year = today.year();
    println!("   {}", year);
    print_tallies(&year_month_rates(snapshot, habit, year));
    println!();

    for month in year_heatmap(snapshot, habit, year) {
        let weeks: String = month
            .weeks
            .iter()
            .map(|week| week.iter().map(|c| c.glyph()).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");
        println!("   {:<4} {}", month.label, weeks);
    }
}

fn print_tallies(tallies: &[PeriodTally]) {
    for tally in tallies {
        println!(
            "   {:<4} {} {:>3}%  ({}/{})",
            tally.label,
            bar(tally.rate()),
            tally.rate(),
            tally.done,
            tally.total
        );
    }
}

pub fn print_month(snapshot: &Snapshot, year: i32, month: u32, format: OutputFormat) -> Result<()> {
    let days = month_progress(snapshot, year, month);

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "year": year,
            "month": month,
            "days": days,
        }));
    }

    header(&format!("{} {}", month_short_name(month), year));
    for day in &days {
        let percent = (day.ratio * 100.0).round() as u8;
        println!(
            "   {} {}  {} {:>3}%  ({}/{})",
            weekday_short_name(weekday_index(day.date)),
            format_date(day.date),
            bar(percent),
            percent,
            day.completed,
            day.due
        );
    }
    println!();
    Ok(())
}

pub fn print_stats(stats: &DashboardStats, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&serde_json::to_value(stats)?);
    }

    header("Statistics");
    if stats.active_habits == 0 {
        println!("  No habits yet.");
        println!();
        return Ok(());
    }

    println!(
        "   Habits:      {:<10} Today: {}",
        stats.active_habits,
        stats.format_today()
    );
    println!(
        "   Best streak: {:<10} Rate ({}d): {}%",
        stats.best_streak, stats.window_days, stats.total_rate
    );
    println!();

    println!("LAST 7 DAYS");
    let max = stats.weekly_max();
    for day in &stats.weekly {
        let width = day.completed * BAR_WIDTH / max;
        println!(
            "   {} {:<width$} {}",
            weekday_short_name(day.weekday),
            "█".repeat(width),
            day.completed,
            width = BAR_WIDTH
        );
    }
    println!();

    println!("HABITS");
    for habit in &stats.habits {
        println!(
            "   {:<24} {} {:>3}%  streak {}",
            habit.name,
            bar(habit.rate),
            habit.rate,
            habit.streak
        );
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_counts_characters() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("açãoçãoção-1"), "açãoçãoç");
    }

    #[test]
    fn test_bar_width_is_fixed() {
        assert_eq!(bar(0).chars().count(), BAR_WIDTH);
        assert_eq!(bar(100), "█".repeat(BAR_WIDTH));
        assert_eq!(bar(50).chars().filter(|c| *c == '█').count(), 10);
    }
}
