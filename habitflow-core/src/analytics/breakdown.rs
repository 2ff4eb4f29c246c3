//! Per-habit series for detail views.
//!
//! Weekly dots, a month calendar, week-by-week tallies for a month, month
//! rates for a year and a year heatmap. Everything is built from
//! [`due`] and [`Snapshot::is_completed`]; nothing here re-derives the
//! schedule rules.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::engine::{due, rounded_percent, Snapshot};
use crate::calendar::{last_days, month_days, month_short_name, weekday_index};
use crate::types::Habit;

/// One day in a short series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayMark {
    pub date: NaiveDate,
    /// 0 = Sunday
    pub weekday: u8,
    pub due: bool,
    pub done: bool,
}

/// The last 7 days ending at `today`, oldest first.
pub fn weekly_series(snapshot: &Snapshot, habit: &Habit, today: NaiveDate) -> Vec<DayMark> {
    last_days(today, 7)
        .into_iter()
        .map(|date| DayMark {
            date,
            weekday: weekday_index(date),
            due: due(habit, date),
            done: snapshot.is_completed(&habit.id, date),
        })
        .collect()
}

/// A calendar cell for one day of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    pub done: bool,
}

/// A Sunday-first month grid.
#[derive(Debug, Clone, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// `None` cells pad the grid up to the month's first weekday
    pub cells: Vec<Option<CalendarDay>>,
}

impl MonthCalendar {
    /// The grid split into rows of 7 (the last row may be shorter).
    pub fn rows(&self) -> impl Iterator<Item = &[Option<CalendarDay>]> {
        self.cells.chunks(7)
    }
}

pub fn month_calendar(snapshot: &Snapshot, habit: &Habit, year: i32, month: u32) -> MonthCalendar {
    let days = month_days(year, month);
    let padding = days.first().map(|d| weekday_index(*d) as usize).unwrap_or(0);

    let mut cells: Vec<Option<CalendarDay>> = vec![None; padding];
    cells.extend(days.into_iter().map(|date| {
        Some(CalendarDay {
            day: date.day(),
            date,
            done: snapshot.is_completed(&habit.id, date),
        })
    }));

    MonthCalendar { year, month, cells }
}

/// Done/total tally over the due days of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTally {
    pub label: String,
    pub done: u32,
    pub total: u32,
}

impl PeriodTally {
    fn new(label: String) -> Self {
        Self {
            label,
            done: 0,
            total: 0,
        }
    }

    fn record(&mut self, snapshot: &Snapshot, habit: &Habit, date: NaiveDate) {
        if due(habit, date) {
            self.total += 1;
            if snapshot.is_completed(&habit.id, date) {
                self.done += 1;
            }
        }
    }

    /// Rounded percentage, 0 when nothing was due.
    pub fn rate(&self) -> u8 {
        rounded_percent(self.done, self.total)
    }
}

/// Week-by-week tallies for a month.
///
/// A week closes on Saturday or on the last day of the month, so the first
/// and last weeks may be partial. Labels are "W1", "W2", ...
pub fn month_week_breakdown(
    snapshot: &Snapshot,
    habit: &Habit,
    year: i32,
    month: u32,
) -> Vec<PeriodTally> {
    let days = month_days(year, month);
    let last = days.last().copied();

    let mut weeks = Vec::new();
    let mut current = PeriodTally::new("W1".to_string());
    for date in days {
        current.record(snapshot, habit, date);
        if weekday_index(date) == 6 || Some(date) == last {
            let next = PeriodTally::new(format!("W{}", weeks.len() + 2));
            weeks.push(std::mem::replace(&mut current, next));
        }
    }
    weeks
}

/// Tallies for each month of `year` (always 12 entries).
pub fn year_month_rates(snapshot: &Snapshot, habit: &Habit, year: i32) -> Vec<PeriodTally> {
    (1..=12)
        .map(|month| {
            let mut tally = PeriodTally::new(month_short_name(month).to_string());
            for date in month_days(year, month) {
                tally.record(snapshot, habit, date);
            }
            tally
        })
        .collect()
}

/// One heatmap square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatCell {
    /// Outside the month
    Padding,
    /// Not scheduled and not done
    Rest,
    /// Scheduled but not done
    Missed,
    Done,
}

impl HeatCell {
    pub fn glyph(&self) -> char {
        match self {
            HeatCell::Padding => ' ',
            HeatCell::Rest => '·',
            HeatCell::Missed => '░',
            HeatCell::Done => '█',
        }
    }
}

/// Heatmap block for one month: Sunday-first weeks of 7 cells.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapMonth {
    pub month: u32,
    pub label: &'static str,
    pub weeks: Vec<[HeatCell; 7]>,
}

pub fn year_heatmap(snapshot: &Snapshot, habit: &Habit, year: i32) -> Vec<HeatmapMonth> {
    (1..=12)
        .map(|month| {
            let days = month_days(year, month);
            let mut week = [HeatCell::Padding; 7];
            let mut weeks = Vec::new();

            for date in days {
                let slot = weekday_index(date) as usize;
                week[slot] = if snapshot.is_completed(&habit.id, date) {
                    HeatCell::Done
                } else if due(habit, date) {
                    HeatCell::Missed
                } else {
                    HeatCell::Rest
                };
                if slot == 6 {
                    weeks.push(week);
                    week = [HeatCell::Padding; 7];
                }
            }
            if week.iter().any(|c| *c != HeatCell::Padding) {
                weeks.push(week);
            }

            HeatmapMonth {
                month,
                label: month_short_name(month),
                weeks,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;
    use crate::types::{Frequency, HabitCompletion, NewHabit};
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn make(frequency: Frequency) -> Habit {
        let mut new = NewHabit::named("Read").with_frequency(frequency);
        if frequency == Frequency::Custom {
            new.custom_days = Some(vec![1]);
        }
        Habit::create_at(
            new,
            "h".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_weekly_series_oldest_first() {
        let habit = make(Frequency::Weekdays);
        let today = date("2024-06-09"); // Sunday
        let snapshot = Snapshot::new(
            vec![habit.clone()],
            vec![HabitCompletion::new("h", date("2024-06-07"))],
        );

        let series = weekly_series(&snapshot, &habit, today);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, date("2024-06-03"));
        assert_eq!(series[6].date, today);
        assert_eq!(series[6].weekday, 0);
        assert!(!series[6].due);
        assert!(series[4].done);
        assert_eq!(series.iter().filter(|d| d.done).count(), 1);
    }

    #[test]
    fn test_month_calendar_padding() {
        let habit = make(Frequency::Daily);
        let snapshot = Snapshot::new(
            vec![habit.clone()],
            vec![HabitCompletion::new("h", date("2024-06-15"))],
        );

        // June 2024 starts on a Saturday
        let calendar = month_calendar(&snapshot, &habit, 2024, 6);
        assert_eq!(calendar.cells.len(), 6 + 30);
        assert!(calendar.cells[..6].iter().all(Option::is_none));
        let first = calendar.cells[6].as_ref().unwrap();
        assert_eq!(first.day, 1);
        let fifteenth = calendar.cells[6 + 14].as_ref().unwrap();
        assert!(fifteenth.done);
        assert_eq!(calendar.rows().count(), 6);
    }

    #[test]
    fn test_month_week_breakdown_closes_on_saturday() {
        let habit = make(Frequency::Weekdays);
        let snapshot = Snapshot::new(
            vec![habit.clone()],
            vec![
                HabitCompletion::new("h", date("2024-06-03")),
                HabitCompletion::new("h", date("2024-06-04")),
            ],
        );

        let weeks = month_week_breakdown(&snapshot, &habit, 2024, 6);
        // Jun 1 (Sat) | 2-8 | 9-15 | 16-22 | 23-29 | 30
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0].label, "W1");
        assert_eq!(weeks[0].total, 0);
        assert_eq!(weeks[1].total, 5);
        assert_eq!(weeks[1].done, 2);
        assert_eq!(weeks[1].rate(), 40);
        assert_eq!(weeks[5].label, "W6");
        assert_eq!(weeks[5].total, 0);
        assert_eq!(weeks.iter().map(|w| w.total).sum::<u32>(), 20);
    }

    #[test]
    fn test_year_month_rates() {
        let habit = make(Frequency::Custom); // Mondays only
        let snapshot = Snapshot::new(
            vec![habit.clone()],
            vec![
                HabitCompletion::new("h", date("2024-01-01")),
                HabitCompletion::new("h", date("2024-01-08")),
            ],
        );

        let months = year_month_rates(&snapshot, &habit, 2024);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].label, "Jan");
        assert_eq!(months[0].total, 5);
        assert_eq!(months[0].done, 2);
        assert_eq!(months[0].rate(), 40);
        assert_eq!(months[1].done, 0);
        assert_eq!(months[1].rate(), 0);
    }

    #[test]
    fn test_year_heatmap_cells() {
        let habit = make(Frequency::Weekdays);
        let snapshot = Snapshot::new(
            vec![habit.clone()],
            vec![HabitCompletion::new("h", date("2024-06-03"))],
        );

        let heatmap = year_heatmap(&snapshot, &habit, 2024);
        assert_eq!(heatmap.len(), 12);
        let june = &heatmap[5];
        assert_eq!(june.label, "Jun");
        assert_eq!(june.weeks.len(), 6);
        // Week 1: only Saturday the 1st
        assert_eq!(june.weeks[0][5], HeatCell::Padding);
        assert_eq!(june.weeks[0][6], HeatCell::Rest);
        // Week 2: Sunday rest, Monday done, Tuesday missed
        assert_eq!(june.weeks[1][0], HeatCell::Rest);
        assert_eq!(june.weeks[1][1], HeatCell::Done);
        assert_eq!(june.weeks[1][2], HeatCell::Missed);
        // Last week: Sunday the 30th, rest padded
        assert_eq!(june.weeks[5][0], HeatCell::Rest);
        assert_eq!(june.weeks[5][1], HeatCell::Padding);
    }
}
