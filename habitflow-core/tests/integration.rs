//! Integration tests for the SQLite store, the session and the analytics
//! engine working together on a database file.

use chrono::NaiveDate;
use habitflow_core::analytics::{month_week_breakdown, DashboardStats};
use habitflow_core::calendar::{days_before, parse_date};
use habitflow_core::{Database, Frequency, HabitSession, HabitStore, HabitUpdate, NewHabit};
use std::path::Path;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn open_session(path: &Path) -> HabitSession<Database> {
    let db = Database::open(path).expect("failed to open db");
    db.migrate().expect("failed to migrate db");
    HabitSession::open(db).expect("failed to load session")
}

#[test]
fn test_toggles_survive_reopen() {
    habitflow_core::logging::init_test();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("habits.db");
    let today = date("2024-06-10"); // Monday

    let habit_id = {
        let mut session = open_session(&path);
        let habit = session.add_habit(NewHabit::named("Read Scripture")).unwrap();
        for offset in 1..=5 {
            session
                .toggle_completion(&habit.id, days_before(today, offset))
                .unwrap();
        }
        habit.id
    };

    let session = open_session(&path);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.habits().len(), 1);
    assert_eq!(snapshot.completion_count(), 5);
    // Today not done yet: forgiven
    assert_eq!(snapshot.streak(&habit_id, today), 5);
    // 5 of 7
    assert_eq!(snapshot.completion_rate(&habit_id, 7, today), 71);
}

#[test]
fn test_weekday_scenario_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut session = open_session(&dir.path().join("habits.db"));

    let habit = session
        .add_habit(NewHabit::named("Devotional").with_frequency(Frequency::Weekdays))
        .unwrap();
    for day in ["2024-06-03", "2024-06-04", "2024-06-05"] {
        session.toggle_completion(&habit.id, date(day)).unwrap();
    }

    let friday = date("2024-06-07");
    let snapshot = session.snapshot();
    assert_eq!(snapshot.streak(&habit.id, friday), 0);
    // Thursday is the last date the streak still reaches back through
    assert_eq!(snapshot.streak(&habit.id, date("2024-06-06")), 3);
    // Mon..Fri: 3 of 5
    assert_eq!(snapshot.completion_rate(&habit.id, 5, friday), 60);

    let weeks = month_week_breakdown(snapshot, snapshot.habit(&habit.id).unwrap(), 2024, 6);
    assert_eq!(weeks[1].done, 3);
    assert_eq!(weeks[1].total, 5);
}

#[test]
fn test_delete_cascades_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("habits.db");
    let d = date("2024-06-03");

    {
        let mut session = open_session(&path);
        let keep = session.add_habit(NewHabit::named("Keep")).unwrap();
        let drop = session.add_habit(NewHabit::named("Drop")).unwrap();
        session.toggle_completion(&keep.id, d).unwrap();
        session.toggle_completion(&drop.id, d).unwrap();
        session.delete_habit(&drop.id).unwrap();
    }

    let db = Database::open(&path).unwrap();
    db.migrate().unwrap();
    assert_eq!(db.count_habits().unwrap(), 1);
    assert_eq!(db.count_completions().unwrap(), 1);
    let habits = db.load_habits().unwrap();
    assert_eq!(habits[0].name, "Keep");
}

#[test]
fn test_update_persists_and_keeps_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("habits.db");

    {
        let mut session = open_session(&path);
        let first = session.add_habit(NewHabit::named("First")).unwrap();
        session.add_habit(NewHabit::named("Second")).unwrap();
        session
            .update_habit(
                &first.id,
                HabitUpdate {
                    name: Some("First, renamed".to_string()),
                    frequency: Some(Frequency::Custom),
                    custom_days: Some(vec![6, 0]),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    let session = open_session(&path);
    let habits = session.snapshot().habits();
    assert_eq!(habits[0].name, "First, renamed");
    assert_eq!(habits[0].custom_days, Some(vec![0, 6]));
    assert_eq!(habits[1].name, "Second");
}

#[test]
fn test_dashboard_from_store() {
    let dir = TempDir::new().unwrap();
    let mut session = open_session(&dir.path().join("habits.db"));
    let today = date("2024-06-08"); // Saturday

    let daily = session.add_habit(NewHabit::named("Pray")).unwrap();
    let weekend = session
        .add_habit(NewHabit::named("Rest").with_frequency(Frequency::Weekends))
        .unwrap();
    session.toggle_completion(&daily.id, today).unwrap();

    let stats = DashboardStats::compute(session.snapshot(), today, 1);
    assert_eq!(stats.today_total, 2);
    assert_eq!(stats.today_done, 1);
    assert_eq!(stats.best_streak, 1);
    // 100 and 0 -> 50
    assert_eq!(stats.total_rate, 50);
    assert_eq!(stats.habits[1].id, weekend.id);
}
