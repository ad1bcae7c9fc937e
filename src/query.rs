use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DATE: &str = "date";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const COUNT: &str = "count";

/// Query parameters sent to the APOD endpoint
///
/// Keys keep insertion order, so the request URL lists them the way the
/// search form produced them:
/// ```text
/// date=2024-03-15
/// start_date=2024-01-01&end_date=2024-01-31
/// count=5
/// ```
///
/// The empty mapping asks the API for today's picture. The search form never
/// produces it; it only exists as the session's starting query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParameters {
    pairs: Vec<(String, String)>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter. Empty values are never stored.
    pub(crate) fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.remove(key);
            return;
        }
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub(crate) fn with_date(mut self, key: &str, date: NaiveDate) -> Self {
        self.insert(key, format_iso_date(date));
        self
    }

    fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for QueryParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "today");
        }
        let joined = self
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        write!(f, "{}", joined)
    }
}

impl Serialize for QueryParameters {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub mod date_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_skips_empty_values() {
        let mut params = QueryParameters::new();
        params.insert(COUNT, "");
        assert!(params.is_empty());

        params.insert(COUNT, "5");
        params.insert(COUNT, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut params = QueryParameters::new();
        params.insert(START_DATE, "2024-01-01");
        params.insert(END_DATE, "2024-01-31");
        params.insert(START_DATE, "2024-01-02");

        let keys: Vec<_> = params.keys().collect();
        assert_eq!(keys, vec![START_DATE, END_DATE]);
        assert_eq!(params.get(START_DATE), Some("2024-01-02"));
        assert_eq!(params.to_string(), "start_date=2024-01-02&end_date=2024-01-31");
    }

    #[test]
    fn test_format_iso_date_pads_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_iso_date(date), "2024-03-05");
    }

    #[test]
    fn test_serializes_as_json_object() {
        let params = QueryParameters::new().with_date(DATE, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({ "date": "2024-03-15" }));
    }

    #[test]
    fn test_empty_parameters_display_as_today() {
        assert_eq!(QueryParameters::default().to_string(), "today");
    }
}
