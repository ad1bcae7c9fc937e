use chrono::{Local, NaiveDate};

use super::ValidationError;
use crate::query::DATE_FORMAT;

/// Guards date inputs against days after "today".
///
/// Comparison is by calendar day only, so any time on the current day is
/// still selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePicker {
    today: NaiveDate,
}

impl DatePicker {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Picker pinned to the local calendar day.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn current_day(&self) -> NaiveDate {
        self.today
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        date <= self.today
    }

    pub fn select(&self, date: NaiveDate) -> Result<NaiveDate, ValidationError> {
        if self.is_selectable(date) {
            Ok(date)
        } else {
            Err(ValidationError::FutureDate {
                date,
                today: self.today,
            })
        }
    }

    /// Parses user input in `YYYY-MM-DD` form and applies the guard.
    pub fn parse(&self, input: &str) -> Result<NaiveDate, ValidationError> {
        let input = input.trim();
        let date = NaiveDate::parse_from_str(input, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(input.to_string()))?;
        self.select(date)
    }
}

impl Default for DatePicker {
    fn default() -> Self {
        Self::today()
    }
}
