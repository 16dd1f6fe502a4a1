//! Error types for availability-grid operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::time::TimeOfDay;

#[derive(Error, Debug)]
pub enum GridError {
    /// Not a zero-padded `HH:MM:SS` string, or a field out of range.
    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("24:00:00 is only valid as an end time")]
    SentinelAsStart,

    /// A window whose start equals its end. `date` is known once the window
    /// has been located inside a schedule.
    #[error("Zero-length window at {time}{}", .date.map(|d| format!(" on {d}")).unwrap_or_default())]
    ZeroLengthWindow {
        date: Option<NaiveDate>,
        time: TimeOfDay,
    },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid granularity: {0} minutes does not evenly divide a day")]
    InvalidGranularity(u32),

    #[error("{hour:02}:{minute:02} is not aligned to a {granularity}-minute grid")]
    MisalignedTime {
        hour: u32,
        minute: u32,
        granularity: u32,
    },

    #[error("Expected {expected} cells for one day, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("No calendar date follows {0}")]
    DateOutOfRange(NaiveDate),

    #[error("Schedule JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// Attach `date` to a window error raised before the window was placed.
    pub(crate) fn on_date(self, date: NaiveDate) -> Self {
        match self {
            GridError::ZeroLengthWindow { time, .. } => GridError::ZeroLengthWindow {
                date: Some(date),
                time,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
