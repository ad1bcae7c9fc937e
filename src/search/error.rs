use chrono::NaiveDate;
use thiserror::Error;

use super::SearchMode;

pub const SELECT_DATE: &str = "Please select a date";
pub const SELECT_RANGE: &str = "Please select both start and end dates";
pub const ENTER_COUNT: &str = "Please enter the number of images";
pub const START_AFTER_END: &str = "Start date must be before end date";
pub const COUNT_BOUNDS: &str = "Please enter a number between 1 and 100";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    MissingField(String),

    #[error("{0}")]
    InvalidRange(String),

    #[error("{0}")]
    OutOfRange(String),

    #[error("{date} is in the future, pick a date on or before {today}")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("The {field} field is not used in {mode} mode")]
    WrongMode {
        field: &'static str,
        mode: SearchMode,
    },
}

impl ValidationError {
    pub fn missing(message: &str) -> Self {
        ValidationError::MissingField(message.to_string())
    }

    pub fn invalid_range(message: &str) -> Self {
        ValidationError::InvalidRange(message.to_string())
    }

    /// The text shown next to the form.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
