use crate::apod::{ApodRecord, FetchError};
use crate::query::QueryParameters;

/// Source of APOD records for a search session.
#[async_trait::async_trait]
pub trait ApodBackend: Send + Sync {
    /// Fetches the records matching `params`. A single-record response is
    /// returned as a one-element vector.
    async fn fetch(&self, params: &QueryParameters) -> Result<Vec<ApodRecord>, FetchError>;
}
