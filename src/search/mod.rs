mod error;
mod picker;

pub use error::ValidationError;
pub use picker::DatePicker;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::query::{QueryParameters, COUNT, DATE, END_DATE, START_DATE};

pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 100;

/// The three mutually exclusive ways to search APOD
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    #[strum(to_string = "date", serialize = "single")]
    SingleDate,
    #[strum(to_string = "range", serialize = "date-range")]
    DateRange,
    #[strum(to_string = "random", serialize = "count")]
    RandomCount,
}

impl SearchMode {
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::SingleDate => "Single date",
            SearchMode::DateRange => "Date range",
            SearchMode::RandomCount => "Random images",
        }
    }

    pub fn names() -> Vec<String> {
        SearchMode::iter().map(|m| m.to_string()).collect()
    }
}

/// Field values owned by the active mode. Only one group exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFields {
    SingleDate {
        date: Option<NaiveDate>,
    },
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    RandomCount {
        /// Raw user input, kept as typed.
        count: Option<String>,
    },
}

impl SearchFields {
    pub fn empty(mode: SearchMode) -> Self {
        match mode {
            SearchMode::SingleDate => SearchFields::SingleDate { date: None },
            SearchMode::DateRange => SearchFields::DateRange {
                start: None,
                end: None,
            },
            SearchMode::RandomCount => SearchFields::RandomCount { count: None },
        }
    }

    pub fn mode(&self) -> SearchMode {
        match self {
            SearchFields::SingleDate { .. } => SearchMode::SingleDate,
            SearchFields::DateRange { .. } => SearchMode::DateRange,
            SearchFields::RandomCount { .. } => SearchMode::RandomCount,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SearchFields::SingleDate { date } => date.is_none(),
            SearchFields::DateRange { start, end } => start.is_none() && end.is_none(),
            SearchFields::RandomCount { count } => count.is_none(),
        }
    }
}

impl Default for SearchFields {
    fn default() -> Self {
        SearchFields::empty(SearchMode::default())
    }
}

/// State of the search form between user events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFormState {
    fields: SearchFields,
    error: Option<String>,
}

impl SearchFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: SearchMode) -> Self {
        let mut state = Self::new();
        state.on_mode_change(mode);
        state
    }

    pub fn mode(&self) -> SearchMode {
        self.fields.mode()
    }

    pub fn fields(&self) -> &SearchFields {
        &self.fields
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Switches the active mode. Fields of every other mode are dropped and any
    /// pending error is cleared, even when `mode` is already active.
    pub fn on_mode_change(&mut self, mode: SearchMode) {
        self.fields = SearchFields::empty(mode);
        self.error = None;
    }

    pub fn set_date(
        &mut self,
        date: Option<NaiveDate>,
        picker: &DatePicker,
    ) -> Result<(), ValidationError> {
        let mode = self.mode();
        let date = date.map(|d| picker.select(d)).transpose()?;
        match &mut self.fields {
            SearchFields::SingleDate { date: slot } => {
                *slot = date;
                Ok(())
            }
            _ => Err(ValidationError::WrongMode { field: DATE, mode }),
        }
    }

    pub fn set_start_date(
        &mut self,
        date: Option<NaiveDate>,
        picker: &DatePicker,
    ) -> Result<(), ValidationError> {
        let mode = self.mode();
        let date = date.map(|d| picker.select(d)).transpose()?;
        match &mut self.fields {
            SearchFields::DateRange { start, .. } => {
                *start = date;
                Ok(())
            }
            _ => Err(ValidationError::WrongMode {
                field: START_DATE,
                mode,
            }),
        }
    }

    pub fn set_end_date(
        &mut self,
        date: Option<NaiveDate>,
        picker: &DatePicker,
    ) -> Result<(), ValidationError> {
        let mode = self.mode();
        let date = date.map(|d| picker.select(d)).transpose()?;
        match &mut self.fields {
            SearchFields::DateRange { end, .. } => {
                *end = date;
                Ok(())
            }
            _ => Err(ValidationError::WrongMode {
                field: END_DATE,
                mode,
            }),
        }
    }

    /// Sets the count, stored in canonical form. Input outside 1..=100 is
    /// refused here, at the input layer; `build` passes whatever is stored
    /// through unchanged.
    pub fn set_count(&mut self, count: Option<&str>) -> Result<(), ValidationError> {
        let mode = self.mode();
        let count = match count {
            Some(raw) if !raw.is_empty() => Some(check_count(raw)?.to_string()),
            _ => None,
        };
        match &mut self.fields {
            SearchFields::RandomCount { count: slot } => {
                *slot = count;
                Ok(())
            }
            _ => Err(ValidationError::WrongMode { field: COUNT, mode }),
        }
    }

    pub fn build(&self) -> Result<QueryParameters, ValidationError> {
        build(self)
    }

    /// Runs `build` and records the outcome: a failure is kept as the form's
    /// error message, a success clears it.
    pub fn submit(&mut self) -> Result<QueryParameters, ValidationError> {
        match build(self) {
            Ok(params) => {
                self.error = None;
                log::debug!("Search form submitted: {}", params);
                Ok(params)
            }
            Err(e) => {
                self.error = Some(e.message());
                log::debug!("Search form rejected: {}", e);
                Err(e)
            }
        }
    }
}

impl fmt::Display for SearchFormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show(date: &Option<NaiveDate>) -> String {
            date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
        }

        write!(f, "[{}] ", self.mode().label())?;
        match &self.fields {
            SearchFields::SingleDate { date } => write!(f, "date: {}", show(date)),
            SearchFields::DateRange { start, end } => {
                write!(f, "start: {}, end: {}", show(start), show(end))
            }
            SearchFields::RandomCount { count } => {
                write!(f, "count: {}", count.as_deref().unwrap_or("-"))
            }
        }
    }
}

/// Converts the form into query parameters for the active mode.
pub fn build(state: &SearchFormState) -> Result<QueryParameters, ValidationError> {
    match &state.fields {
        SearchFields::SingleDate { date } => {
            let date = date.ok_or_else(|| ValidationError::missing(error::SELECT_DATE))?;
            Ok(QueryParameters::new().with_date(DATE, date))
        }
        SearchFields::DateRange { start, end } => {
            let (start, end) = match (start, end) {
                (Some(start), Some(end)) => (*start, *end),
                _ => return Err(ValidationError::missing(error::SELECT_RANGE)),
            };
            if start > end {
                return Err(ValidationError::invalid_range(error::START_AFTER_END));
            }
            Ok(QueryParameters::new()
                .with_date(START_DATE, start)
                .with_date(END_DATE, end))
        }
        SearchFields::RandomCount { count } => match count.as_deref() {
            Some(raw) if !raw.is_empty() => {
                let mut params = QueryParameters::new();
                params.insert(COUNT, raw);
                Ok(params)
            }
            _ => Err(ValidationError::missing(error::ENTER_COUNT)),
        },
    }
}

fn check_count(raw: &str) -> Result<u32, ValidationError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (MIN_COUNT..=MAX_COUNT).contains(n))
        .ok_or_else(|| ValidationError::OutOfRange(error::COUNT_BOUNDS.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn picker() -> DatePicker {
        DatePicker::new(ymd(2024, 6, 30))
    }

    #[test]
    fn test_default_mode_is_single_date() {
        let state = SearchFormState::new();
        assert_eq!(state.mode(), SearchMode::SingleDate);
        assert!(state.fields().is_empty());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_mode_names_parse() {
        assert_eq!("date".parse::<SearchMode>(), Ok(SearchMode::SingleDate));
        assert_eq!("RANGE".parse::<SearchMode>(), Ok(SearchMode::DateRange));
        assert_eq!("random".parse::<SearchMode>(), Ok(SearchMode::RandomCount));
        assert_eq!("count".parse::<SearchMode>(), Ok(SearchMode::RandomCount));
        assert!("weekly".parse::<SearchMode>().is_err());
        assert_eq!(SearchMode::names(), vec!["date", "range", "random"]);
    }

    #[test]
    fn test_set_field_of_other_mode_is_rejected() {
        let mut state = SearchFormState::new();
        let err = state.set_count(Some("5")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongMode {
                field: COUNT,
                mode: SearchMode::SingleDate
            }
        );
        assert!(state.fields().is_empty());
    }

    #[test]
    fn test_set_date_rejects_future() {
        let mut state = SearchFormState::new();
        let result = state.set_date(Some(ymd(2024, 7, 1)), &picker());
        assert!(matches!(result, Err(ValidationError::FutureDate { .. })));
        assert!(state.fields().is_empty());
    }

    #[test]
    fn test_set_count_enforces_bounds() {
        let mut state = SearchFormState::with_mode(SearchMode::RandomCount);
        for raw in ["0", "101", "-3", "five", "2.5"] {
            assert_eq!(
                state.set_count(Some(raw)),
                Err(ValidationError::OutOfRange(error::COUNT_BOUNDS.to_string())),
                "{} should be refused",
                raw
            );
        }
        assert!(state.set_count(Some("1")).is_ok());
        assert!(state.set_count(Some("100")).is_ok());
        assert!(state.set_count(Some("")).is_ok());
        assert!(state.fields().is_empty());
    }

    #[test]
    fn test_set_count_stores_canonical_number() {
        let mut state = SearchFormState::with_mode(SearchMode::RandomCount);
        for raw in [" 5", "+5", "05 "] {
            state.set_count(Some(raw)).unwrap();
            assert_eq!(state.build().unwrap().get(COUNT), Some("5"), "{:?}", raw);
        }
    }

    #[test]
    fn test_build_single_date() {
        let mut state = SearchFormState::new();
        state.set_date(Some(ymd(2024, 3, 15)), &picker()).unwrap();
        let params = state.build().unwrap();
        assert_eq!(params.get(DATE), Some("2024-03-15"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_build_range_with_one_end_missing() {
        let mut state = SearchFormState::with_mode(SearchMode::DateRange);
        state.set_start_date(Some(ymd(2024, 1, 1)), &picker()).unwrap();
        assert_eq!(
            state.build(),
            Err(ValidationError::MissingField(error::SELECT_RANGE.to_string()))
        );
    }

    #[test]
    fn test_build_count_passes_raw_value() {
        let state = SearchFormState {
            fields: SearchFields::RandomCount {
                count: Some("250".to_string()),
            },
            error: None,
        };
        assert_eq!(state.build().unwrap().get(COUNT), Some("250"));
    }

    #[test]
    fn test_submit_records_and_clears_error() {
        let mut state = SearchFormState::new();
        assert!(state.submit().is_err());
        assert_eq!(state.error(), Some(error::SELECT_DATE));

        state.set_date(Some(ymd(2024, 3, 15)), &picker()).unwrap();
        assert!(state.submit().is_ok());
        assert!(state.error().is_none());
    }

    #[test]
    fn test_mode_change_is_idempotent() {
        let mut once = SearchFormState::new();
        once.set_date(Some(ymd(2024, 3, 15)), &picker()).unwrap();
        let _ = once.submit();
        let mut twice = once.clone();

        once.on_mode_change(SearchMode::DateRange);
        twice.on_mode_change(SearchMode::DateRange);
        twice.on_mode_change(SearchMode::DateRange);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_display() {
        let mut state = SearchFormState::with_mode(SearchMode::DateRange);
        state.set_end_date(Some(ymd(2024, 1, 31)), &picker()).unwrap();
        assert_eq!(state.to_string(), "[Date range] start: -, end: 2024-01-31");
    }
}
