use anyhow::{anyhow, Result};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.nasa.gov/planetary/apod";
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";
pub const DEFAULT_USER_AGENT: &str = "apod-explorer/0.1";

#[derive(Clone, Debug)]
pub struct ApodConfig {
    pub api_key: String,
    pub api_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_concurrent: usize,
}

impl Default for ApodConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_concurrent: 4,
        }
    }
}

impl ApodConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = match lookup("NASA_API_KEY") {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => {
                log::warn!("NASA_API_KEY not set, using {}", DEFAULT_API_KEY);
                defaults.api_key
            }
        };

        let api_url = lookup("APOD_API_URL").unwrap_or(defaults.api_url);
        url::Url::parse(&api_url).map_err(|e| anyhow!("Invalid APOD_API_URL '{}': {}", api_url, e))?;

        let user_agent = lookup("APOD_USER_AGENT").unwrap_or(defaults.user_agent);

        let timeout = match lookup("APOD_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse()
                    .map_err(|_| anyhow!("APOD_TIMEOUT_SECS must be a whole number, got '{}'", secs))?,
            ),
            None => defaults.timeout,
        };

        let max_concurrent = match lookup("APOD_MAX_CONCURRENT") {
            Some(n) => n
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("APOD_MAX_CONCURRENT must be a positive number, got '{}'", n))?,
            None => defaults.max_concurrent,
        };

        Ok(Self {
            api_key,
            api_url,
            user_agent,
            timeout,
            connect_timeout: defaults.connect_timeout,
            max_concurrent,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ApodConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_key, DEFAULT_API_KEY);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_concurrent, 4);
    }

    #[test]
    fn test_reads_overrides() {
        let config = ApodConfig::from_lookup(lookup(&[
            ("NASA_API_KEY", "abc123"),
            ("APOD_API_URL", "http://localhost:8080/apod"),
            ("APOD_TIMEOUT_SECS", "5"),
            ("APOD_MAX_CONCURRENT", "2"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.api_url, "http://localhost:8080/apod");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_concurrent, 2);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ApodConfig::from_lookup(lookup(&[("APOD_API_URL", "not a url")])).is_err());
        assert!(ApodConfig::from_lookup(lookup(&[("APOD_TIMEOUT_SECS", "soon")])).is_err());
        assert!(ApodConfig::from_lookup(lookup(&[("APOD_MAX_CONCURRENT", "0")])).is_err());
    }
}
