// src/config.rs

use crate::error::{ExportSalesError, Result};
use std::{env, time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://apps.fas.usda.gov/export-sales/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "EXPORT_SALES_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "EXPORT_SALES_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "EXPORT_SALES_USER_AGENT";

/// Runtime settings for fetching export-sales pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the `<code>.htm` pages. Always ends with `/`.
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL should parse"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("exportsales/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Defaults overridden by any `EXPORT_SALES_*` variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_BASE_URL) {
            cfg = cfg.with_base_url(&raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid(ENV_TIMEOUT_SECS, e))?;
            cfg = cfg.with_timeout_secs(secs)?;
        }
        if let Some(raw) = lookup(ENV_USER_AGENT) {
            let ua = raw.trim();
            if ua.is_empty() {
                return Err(invalid(ENV_USER_AGENT, "must not be empty"));
            }
            cfg.user_agent = ua.to_string();
        }
        Ok(cfg)
    }

    pub fn with_base_url(mut self, raw: &str) -> Result<Self> {
        let mut raw = raw.trim().to_string();
        // Url::join drops the last path segment unless the base ends in '/'.
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|e| invalid(ENV_BASE_URL, e))?;
        if url.cannot_be_a_base() {
            return Err(invalid(ENV_BASE_URL, "URL cannot be a base"));
        }
        self.base_url = url;
        Ok(self)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(invalid(ENV_TIMEOUT_SECS, "must be at least 1 second"));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }

    /// Build an HTTP client honouring the timeout and user agent.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| invalid("http client", e))
    }
}

fn invalid(key: &str, reason: impl ToString) -> ExportSalesError {
    ExportSalesError::InvalidConfig {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.user_agent.starts_with("exportsales/"));
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://localhost:8080/mirror"),
            (ENV_TIMEOUT_SECS, " 5 "),
            (ENV_USER_AGENT, "tester/1.0"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://localhost:8080/mirror/");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.user_agent, "tester/1.0");
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Config::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, ExportSalesError::InvalidConfig { ref key, .. } if key == ENV_TIMEOUT_SECS));

        let err = Config::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).unwrap_err();
        assert!(matches!(err, ExportSalesError::InvalidConfig { .. }));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = Config::from_lookup(lookup(&[(ENV_BASE_URL, "not a url")])).unwrap_err();
        assert!(matches!(err, ExportSalesError::InvalidConfig { ref key, .. } if key == ENV_BASE_URL));
    }
}
