//! # habitflow-core
//!
//! Core library for habitflow - a habit tracker.
//!
//! This library provides:
//! - Domain types for habits and completions
//! - The habit analytics engine (due dates, streaks, completion rates)
//! - Aggregate series for weekly, monthly and yearly views
//! - A SQLite store and a session type that keeps an in-memory snapshot in
//!   sync with it
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use habitflow_core::{calendar, Config, Database, HabitSession, NewHabit};
//!
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let mut session = HabitSession::open(db).expect("failed to load habits");
//! let habit = session.add_habit(NewHabit::named("Morning prayer")).unwrap();
//!
//! let today = calendar::today();
//! session.toggle_completion(&habit.id, today).unwrap();
//! println!("streak: {}", session.snapshot().streak(&habit.id, today));
//! ```

// Re-export commonly used items at the crate root
pub use analytics::Snapshot;
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use session::HabitSession;
pub use store::HabitStore;
pub use types::*;

// Public modules
pub mod analytics;
pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;
pub mod types;
