//! Client configuration.
//!
//! Resolves where the notes/auth backend lives. Values come from explicit
//! settings first, then the `SMARTNOTES_API_BASE_URL` environment variable,
//! then the local development default.

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

/// Backend URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the backend URL.
pub const API_BASE_URL_ENV: &str = "SMARTNOTES_API_BASE_URL";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Build a config from an explicit URL, falling back to env then default.
    pub fn resolve(explicit_base_url: Option<String>) -> Result<Self> {
        let raw = normalize_text_option(explicit_base_url)
            .or_else(|| normalize_text_option(std::env::var(API_BASE_URL_ENV).ok()))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            api_base_url: normalize_api_base_url(&raw)?,
            ..Self::default()
        })
    }
}

/// Trim, require an http(s) scheme and drop trailing slashes.
pub fn normalize_api_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::Config("API base URL must not be empty".to_string()));
    }
    if !is_http_url(trimmed) {
        return Err(Error::Config(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

const fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_api_base_url_strips_trailing_slash() {
        assert_eq!(
            normalize_api_base_url(" https://notes.example.com/api/ ").unwrap(),
            "https://notes.example.com/api"
        );
    }

    #[test]
    fn normalize_api_base_url_rejects_invalid_values() {
        assert!(normalize_api_base_url("   ").is_err());
        assert!(normalize_api_base_url("notes.example.com/api").is_err());
    }

    #[test]
    fn resolve_prefers_explicit_url() {
        let config = ClientConfig::resolve(Some("http://127.0.0.1:9000/api/".to_string())).unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn config_deserializes_without_timeout() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_base_url":"http://localhost:8000/api"}"#).unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
