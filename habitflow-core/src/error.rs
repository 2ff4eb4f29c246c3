//! Error types for habitflow-core

use thiserror::Error;

/// Main error type for the habitflow-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Habit not found
    #[error("habit not found: {0}")]
    HabitNotFound(String),

    /// A date string that is not a canonical `YYYY-MM-DD` calendar date
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Habit definition rejected at the creation/update boundary
    #[error("invalid habit: {0}")]
    InvalidHabit(String),
}

/// Result type alias for habitflow-core
pub type Result<T> = std::result::Result<T, Error>;
