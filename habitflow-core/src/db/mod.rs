//! Database layer for habitflow
//!
//! SQLite storage for habits and completions:
//! - Schema migrations tracked with `PRAGMA user_version`
//! - [`Database`] implements [`HabitStore`](crate::HabitStore)

pub mod repo;
pub mod schema;

pub use repo::Database;
