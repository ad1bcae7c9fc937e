use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    /// Anything the API adds later, e.g. interactive pages.
    #[serde(other)]
    Other,
}

/// One Astronomy Picture of the Day entry
///
/// # JSON Format
/// ```json
/// {
///   "date": "2024-03-15",
///   "title": "The Cat's Eye Nebula",
///   "explanation": "...",
///   "media_type": "image",
///   "url": "https://apod.nasa.gov/apod/image/2403/catseye.jpg",
///   "hdurl": "https://apod.nasa.gov/apod/image/2403/catseye_big.jpg",
///   "copyright": "Jane Doe",
///   "service_version": "v1"
/// }
/// ```
/// `hdurl` and `copyright` are optional. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApodRecord {
    #[serde(with = "crate::query::date_format")]
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    pub media_type: MediaType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default)]
    pub service_version: String,
}

impl ApodRecord {
    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }

    /// URL shown in the detail view: the HD image when there is one, the
    /// regular URL otherwise. Videos always use `url`.
    pub fn display_url(&self) -> &str {
        match (&self.media_type, &self.hdurl) {
            (MediaType::Image, Some(hd)) if !hd.is_empty() => hd,
            _ => &self.url,
        }
    }

    pub fn copyright(&self) -> Option<&str> {
        self.copyright
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// The endpoint answers a single object for `date` queries and for the
/// default query, and an array for `count` and `start_date` queries.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApodResponse {
    Many(Vec<ApodRecord>),
    One(Box<ApodRecord>),
}

impl ApodResponse {
    pub(crate) fn into_records(self) -> Vec<ApodRecord> {
        match self {
            ApodResponse::Many(records) => records,
            ApodResponse::One(record) => vec![*record],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO: &str = r#"{
        "date": "2024-02-01",
        "title": "A Solar Eclipse in Motion",
        "explanation": "Watch the Moon cross the Sun.",
        "media_type": "video",
        "url": "https://www.youtube.com/embed/abc",
        "hdurl": "https://example.org/ignored.jpg",
        "service_version": "v1",
        "thumbnail_url": "https://example.org/thumb.jpg"
    }"#;

    #[test]
    fn test_video_ignores_hdurl_and_unknown_fields() {
        let record: ApodRecord = serde_json::from_str(VIDEO).unwrap();
        assert_eq!(record.media_type, MediaType::Video);
        assert!(!record.is_image());
        assert_eq!(record.display_url(), "https://www.youtube.com/embed/abc");
        assert_eq!(record.copyright(), None);
    }

    #[test]
    fn test_unknown_media_type() {
        let json = VIDEO.replace("\"video\"", "\"other\"");
        let record: ApodRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.media_type, MediaType::Other);
        assert_eq!(record.media_type.to_string(), "other");
    }

    #[test]
    fn test_blank_copyright_is_hidden() {
        let mut record: ApodRecord = serde_json::from_str(VIDEO).unwrap();
        record.copyright = Some("\n  ".to_string());
        assert_eq!(record.copyright(), None);
        record.copyright = Some("\nJane Doe\n".to_string());
        assert_eq!(record.copyright(), Some("Jane Doe"));
    }
}
