//! Database repository layer
//!
//! Query and write operations for habits and completions.

use crate::error::{Error, Result};
use crate::store::HabitStore;
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Habit operations
    // ============================================

    /// Get a habit by ID
    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT * FROM habits WHERE id = ?", [id], Self::row_to_habit)
            .optional()
            .map_err(Error::from)
    }

    /// List habits in creation order
    pub fn list_habits(&self) -> Result<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM habits ORDER BY created_at ASC, rowid ASC")?;
        let habits = stmt
            .query_map([], Self::row_to_habit)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(habits)
    }

    pub fn count_habits(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM habits", [], |r| r.get(0))?;
        Ok(count)
    }

    fn row_to_habit(row: &Row) -> rusqlite::Result<Habit> {
        let frequency_str: String = row.get("frequency")?;
        let custom_days_str: Option<String> = row.get("custom_days")?;
        let created_at_str: String = row.get("created_at")?;

        let frequency = frequency_str
            .parse::<Frequency>()
            .map_err(|e| conversion_error(row, "frequency", e.into()))?;

        let custom_days = custom_days_str
            .map(|s| serde_json::from_str::<Vec<u8>>(&s))
            .transpose()
            .map_err(|e| conversion_error(row, "custom_days", Box::new(e)))?;

        Ok(Habit {
            id: row.get("id")?,
            name: row.get("name")?,
            color: row.get("color")?,
            icon: row.get("icon")?,
            frequency,
            custom_days,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| conversion_error(row, "created_at", Box::new(e)))?,
            reminder: row.get("reminder")?,
        })
    }

    // ============================================
    // Completion operations
    // ============================================

    /// List completions for one habit, oldest first
    pub fn list_completions_for(&self, habit_id: &str) -> Result<Vec<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT habit_id, date FROM habit_completions WHERE habit_id = ? ORDER BY date ASC",
        )?;
        let dates = stmt
            .query_map([habit_id], Self::row_to_completion)?
            .map(|r| r.map(|c| c.date))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(dates)
    }

    pub fn count_completions(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM habit_completions", [], |r| r.get(0))?;
        Ok(count)
    }

    fn row_to_completion(row: &Row) -> rusqlite::Result<HabitCompletion> {
        let date_str: String = row.get("date")?;
        // Accept a trailing time component ("2024-06-03T00:00:00") and keep the day
        let day = date_str.split('T').next().unwrap_or(&date_str);
        let date = NaiveDate::parse_from_str(day, crate::calendar::DATE_FORMAT)
            .map_err(|e| conversion_error(row, "date", Box::new(e)))?;

        Ok(HabitCompletion {
            habit_id: row.get("habit_id")?,
            date,
        })
    }
}

fn conversion_error(
    row: &Row,
    column: &str,
    err: Box<dyn std::error::Error + Send + Sync>,
) -> rusqlite::Error {
    let index = row.as_ref().column_index(column).unwrap_or(0);
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, err)
}

impl HabitStore for Database {
    fn load_habits(&self) -> Result<Vec<Habit>> {
        self.list_habits()
    }

    fn load_completions(&self) -> Result<Vec<HabitCompletion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT habit_id, date FROM habit_completions")?;
        let completions = stmt
            .query_map([], Self::row_to_completion)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(completions)
    }

    fn insert_habit(&self, habit: &Habit) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO habits (id, name, color, icon, frequency, custom_days, reminder, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                habit.id,
                habit.name,
                habit.color,
                habit.icon,
                habit.frequency.as_str(),
                custom_days_json(habit)?,
                habit.reminder,
                habit.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn update_habit(&self, habit: &Habit) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            r#"
            UPDATE habits SET
                name = ?2,
                color = ?3,
                icon = ?4,
                frequency = ?5,
                custom_days = ?6,
                reminder = ?7
            WHERE id = ?1
            "#,
            params![
                habit.id,
                habit.name,
                habit.color,
                habit.icon,
                habit.frequency.as_str(),
                custom_days_json(habit)?,
                habit.reminder,
            ],
        )?;
        if changed == 0 {
            return Err(Error::HabitNotFound(habit.id.clone()));
        }
        Ok(())
    }

    fn delete_habit(&self, habit_id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM habits WHERE id = ?", [habit_id])?;
        Ok(deleted > 0)
    }

    fn apply_toggle(&self, habit_id: &str, date: NaiveDate) -> Result<bool> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let date_str = crate::calendar::format_date(date);

        let removed = tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ?1 AND date = ?2",
            params![habit_id, date_str],
        )?;

        let done = if removed == 0 {
            tx.execute(
                "INSERT INTO habit_completions (habit_id, date, created_at) VALUES (?1, ?2, ?3)",
                params![habit_id, date_str, Utc::now().to_rfc3339()],
            )?;
            true
        } else {
            false
        };

        tx.commit()?;
        Ok(done)
    }
}

fn custom_days_json(habit: &Habit) -> Result<Option<String>> {
    habit
        .custom_days
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date;
    use chrono::TimeZone;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn habit_at(id: &str, new: NewHabit, hour: u32) -> Habit {
        Habit::create_at(
            new,
            id.to_string(),
            Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_habit_round_trip() {
        let db = test_db();
        let mut new = NewHabit::named("Pray").with_custom_days(vec![0, 3]);
        new.reminder = Some("07:30".to_string());
        let habit = habit_at("h1", new, 8);
        db.insert_habit(&habit).unwrap();

        let loaded = db.get_habit("h1").unwrap().unwrap();
        assert_eq!(loaded, habit);
        assert!(db.get_habit("missing").unwrap().is_none());
    }

    #[test]
    fn test_habits_listed_in_creation_order() {
        let db = test_db();
        db.insert_habit(&habit_at("late", NewHabit::named("Late"), 12)).unwrap();
        db.insert_habit(&habit_at("early", NewHabit::named("Early"), 6)).unwrap();
        db.insert_habit(&habit_at("tie", NewHabit::named("Tie"), 12)).unwrap();

        let ids: Vec<_> = db.list_habits().unwrap().into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["early", "late", "tie"]);
    }

    #[test]
    fn test_update_habit() {
        let db = test_db();
        let mut habit = habit_at("h1", NewHabit::named("Read"), 8);
        db.insert_habit(&habit).unwrap();

        habit
            .apply_update(HabitUpdate {
                name: Some("Read Psalms".to_string()),
                frequency: Some(Frequency::Weekends),
                ..Default::default()
            })
            .unwrap();
        db.update_habit(&habit).unwrap();
        assert_eq!(db.get_habit("h1").unwrap().unwrap(), habit);

        let ghost = habit_at("ghost", NewHabit::named("Ghost"), 8);
        assert!(matches!(
            db.update_habit(&ghost),
            Err(Error::HabitNotFound(_))
        ));
    }

    #[test]
    fn test_toggle_flips_and_restores() {
        let db = test_db();
        db.insert_habit(&habit_at("h1", NewHabit::named("Read"), 8)).unwrap();
        let d = parse_date("2024-06-03").unwrap();

        assert!(db.apply_toggle("h1", d).unwrap());
        assert_eq!(db.list_completions_for("h1").unwrap(), vec![d]);
        assert!(!db.apply_toggle("h1", d).unwrap());
        assert_eq!(db.count_completions().unwrap(), 0);
    }

    #[test]
    fn test_toggle_unknown_habit_fails() {
        let db = test_db();
        let d = parse_date("2024-06-03").unwrap();
        assert!(matches!(
            db.apply_toggle("missing", d),
            Err(Error::Database(_))
        ));
        assert_eq!(db.count_completions().unwrap(), 0);
    }

    #[test]
    fn test_delete_cascades_to_completions() {
        let db = test_db();
        db.insert_habit(&habit_at("a", NewHabit::named("A"), 8)).unwrap();
        db.insert_habit(&habit_at("b", NewHabit::named("B"), 9)).unwrap();
        let d = parse_date("2024-06-03").unwrap();
        db.apply_toggle("a", d).unwrap();
        db.apply_toggle("b", d).unwrap();

        assert!(db.delete_habit("a").unwrap());
        assert!(!db.delete_habit("a").unwrap());
        assert_eq!(db.count_habits().unwrap(), 1);
        let remaining = db.load_completions().unwrap();
        assert_eq!(remaining, vec![HabitCompletion::new("b", d)]);
    }

    #[test]
    fn test_completion_date_with_time_component() {
        let db = test_db();
        db.insert_habit(&habit_at("a", NewHabit::named("A"), 8)).unwrap();
        {
            let conn = db.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO habit_completions (habit_id, date, created_at)
                 VALUES ('a', '2024-06-03T00:00:00', '2024-06-03T10:00:00Z')",
                [],
            )
            .unwrap();
        }
        assert_eq!(
            db.list_completions_for("a").unwrap(),
            vec![parse_date("2024-06-03").unwrap()]
        );
    }
}
