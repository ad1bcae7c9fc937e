mod record;
pub use record::{ApodRecord, MediaType};

use record::ApodResponse;
use reqwest::{header, Client, StatusCode};
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::core::config::ApodConfig;
use crate::core::types::ApodBackend;
use crate::query::QueryParameters;
use crate::utils::rate_limit::RateLimiter;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("APOD request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected APOD response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid APOD endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("request limiter closed")]
    Limiter(#[from] tokio::sync::AcquireError),
}

/// HTTP client for the APOD endpoint.
#[derive(Clone)]
pub struct ApodClient {
    client: Client,
    config: Arc<ApodConfig>,
    limiter: Arc<RateLimiter>,
}

impl ApodClient {
    pub fn new(config: ApodConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        let limiter = Arc::new(RateLimiter::new(config.max_concurrent));

        Ok(Self {
            client,
            config: Arc::new(config),
            limiter,
        })
    }

    /// Endpoint URL with the credential first, then the search parameters in
    /// their original order.
    pub fn request_url(&self, params: &QueryParameters) -> Result<Url, FetchError> {
        let pairs = std::iter::once(("api_key", self.config.api_key.as_str())).chain(params.iter());
        Ok(Url::parse_with_params(&self.config.api_url, pairs)?)
    }

    pub async fn fetch(&self, params: &QueryParameters) -> Result<Vec<ApodRecord>, FetchError> {
        let url = self.request_url(params)?;
        log::debug!("APOD request: {}", redact(&url));

        let _permit = self.limiter.acquire().await?;
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, mime::APPLICATION_JSON.as_ref())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::error!("APOD request for {} failed: {} {}", params, status, body);
            return Err(FetchError::Status { status, body });
        }

        let records = decode_response(&body)?;
        log::info!("Fetched {} APOD record(s) for {}", records.len(), params);
        Ok(records)
    }
}

#[async_trait::async_trait]
impl ApodBackend for ApodClient {
    async fn fetch(&self, params: &QueryParameters) -> Result<Vec<ApodRecord>, FetchError> {
        ApodClient::fetch(self, params).await
    }
}

/// Decodes a response body that is either one record or an array of them.
pub fn decode_response(body: &str) -> Result<Vec<ApodRecord>, FetchError> {
    let response: ApodResponse = serde_json::from_str(body).map_err(|e| {
        log::debug!("Raw APOD response: {}", body);
        e
    })?;
    Ok(response.into_records())
}

fn redact(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_key" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
