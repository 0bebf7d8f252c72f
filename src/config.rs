use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

/// Backend assumed when nothing is configured; the Spring service listens here
/// in development.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
/// Records fetched per page by the list screens.
pub const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const BACKEND_URL_VAR: &str = "MOVIESTAR_BACKEND_URL";
const PAGE_SIZE_VAR: &str = "MOVIESTAR_PAGE_SIZE";
const TIMEOUT_VAR: &str = "MOVIESTAR_TIMEOUT_SECS";

/// Runtime settings, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub page_size: usize,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load settings from the process environment, honouring a `.env` file in
    /// the working directory when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset or blank
    /// variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = read(BACKEND_URL_VAR) {
            let url = url.trim().trim_end_matches('/').to_string();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow!("{BACKEND_URL_VAR} must be an http(s) URL, got {url}"));
            }
            config.backend_url = url;
        }

        if let Some(raw) = read(PAGE_SIZE_VAR) {
            let size: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("{PAGE_SIZE_VAR} must be a positive integer"))?;
            if size == 0 {
                return Err(anyhow!("{PAGE_SIZE_VAR} must be a positive integer"));
            }
            config.page_size = size;
        }

        if let Some(raw) = read(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{TIMEOUT_VAR} must be a number of seconds"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
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
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = Config::from_lookup(lookup(&[
            (BACKEND_URL_VAR, " https://movies.example.org/ "),
            (PAGE_SIZE_VAR, "25"),
            (TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.backend_url, "https://movies.example.org");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Config::from_lookup(lookup(&[(PAGE_SIZE_VAR, "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[(PAGE_SIZE_VAR, "ten")])).is_err());
    }

    #[test]
    fn non_http_backend_is_rejected() {
        assert!(Config::from_lookup(lookup(&[(BACKEND_URL_VAR, "localhost:8080")])).is_err());
    }
}
