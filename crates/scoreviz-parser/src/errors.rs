use std::fmt;

use thiserror::Error;

/// Why a single data row was skipped or partially read.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("row could not be read: {0}")]
    Read(#[from] csv::Error),

    #[error("row has no {column} value")]
    MissingColumn { column: &'static str },

    #[error("unparseable date/time '{value}'")]
    Timestamp { value: String },

    #[error("local time '{value}' does not exist in {timezone}")]
    NonexistentLocalTime { value: String, timezone: String },

    #[error("timestamp for '{value}' is not a usable instant")]
    InvalidInstant { value: String },

    #[error("column {column} holds non-numeric points '{value}'")]
    Points { column: &'static str, value: String },
}

impl RowError {
    /// Row-level problems that remove the record from the match list.
    pub fn drops_row(&self) -> bool {
        !matches!(self, RowError::Points { .. })
    }
}

#[derive(Debug)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: RowError,
}

impl SkippedRow {
    pub fn new(line: u64, reason: RowError) -> Self {
        Self { line, reason }
    }
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}
