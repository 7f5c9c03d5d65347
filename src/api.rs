//! Backend statistics API client and credential resolution

use crate::types::StatisticsResponse;
use crate::utils::paths;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Production backend host, used when nothing overrides it
pub const HOST_PROD: &str = "https://dioparkapp-production.up.railway.app";

/// Statistics endpoint path
pub const STATISTICS_PATH: &str = "/api/statistic/transaksi";

/// Environment variable consulted for the bearer token
pub const TOKEN_ENV: &str = "PARKSTAT_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(
        "no credential found: pass --token, set {TOKEN_ENV}, or add \"token\" to the config file"
    )]
    MissingCredential,
    #[error("backend rejected the credential (HTTP {0})")]
    Unauthorized(StatusCode),
    #[error("statistics request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("statistics response was not valid: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Narrow seam over the remote statistics endpoint so the filter and the
/// rendering layers can be driven by a test double.
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    async fn fetch_statistics(&self, token: &str) -> Result<StatisticsResponse, ApiError>;
}

/// HTTP client for the parking backend
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn statistics_url(&self) -> String {
        format!("{}{}", self.base_url, STATISTICS_PATH)
    }
}

#[async_trait]
impl StatisticsSource for BackendClient {
    async fn fetch_statistics(&self, token: &str) -> Result<StatisticsResponse, ApiError> {
        let response = self
            .client
            .get(self.statistics_url())
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .header("User-Agent", concat!("parkstat/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized(status));
        }

        let response = response.error_for_status()?;
        response
            .json::<StatisticsResponse>()
            .await
            .map_err(ApiError::Decode)
    }
}

/// Optional settings file at `~/.parkstat/config.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub token: Option<String>,
    pub base_url: Option<String>,
}

impl ConfigFile {
    /// Read a config file if present. A missing file is an empty config;
    /// an unreadable or malformed one is too, so startup never fails on it.
    pub fn read_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn load() -> Self {
        match paths::config_file() {
            Some(path) => Self::read_from(&path),
            None => Self::default(),
        }
    }
}

/// Resolve the bearer token: CLI flag, then environment, then config file.
///
/// The token is always passed into the fetch explicitly; nothing downstream
/// reads ambient state.
pub fn resolve_token(
    flag: Option<&str>,
    env: Option<&str>,
    config: &ConfigFile,
) -> Result<String, ApiError> {
    if let Some(token) = flag {
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }
    if let Some(token) = env {
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }
    if let Some(ref token) = config.token {
        return Ok(token.clone());
    }
    Err(ApiError::MissingCredential)
}

/// Resolve the backend base URL: CLI flag, then config file, then production.
pub fn resolve_base_url(flag: Option<&str>, config: &ConfigFile) -> String {
    flag.map(str::to_string)
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| HOST_PROD.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn token_precedence_is_flag_env_config() {
        let config = ConfigFile {
            token: Some("from-config".into()),
            base_url: None,
        };

        let token = resolve_token(Some("from-flag"), Some("from-env"), &config).unwrap();
        assert_eq!(token, "from-flag");

        let token = resolve_token(None, Some("from-env"), &config).unwrap();
        assert_eq!(token, "from-env");

        let token = resolve_token(None, None, &config).unwrap();
        assert_eq!(token, "from-config");
    }

    #[test]
    fn missing_token_is_a_hard_precondition() {
        let err = resolve_token(None, None, &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential));
    }

    #[test]
    fn empty_flag_or_env_token_does_not_count() {
        let config = ConfigFile {
            token: Some("from-config".into()),
            base_url: None,
        };
        let token = resolve_token(None, Some(""), &config).unwrap();
        assert_eq!(token, "from-config");

        let token = resolve_token(Some(""), Some("from-env"), &config).unwrap();
        assert_eq!(token, "from-env");

        let err = resolve_token(Some(""), Some(""), &ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential));
    }

    #[test]
    fn base_url_falls_back_to_production() {
        assert_eq!(resolve_base_url(None, &ConfigFile::default()), HOST_PROD);

        let config = ConfigFile {
            token: None,
            base_url: Some("http://localhost:3000".into()),
        };
        assert_eq!(resolve_base_url(None, &config), "http://localhost:3000");
        assert_eq!(
            resolve_base_url(Some("http://staging:3000"), &config),
            "http://staging:3000"
        );
    }

    #[test]
    fn config_file_reads_and_tolerates_garbage() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("config.json");
        let mut f = fs::File::create(&good).unwrap();
        write!(f, r#"{{"token": "abc", "base_url": "http://localhost:3000"}}"#).unwrap();
        let config = ConfigFile::read_from(&good);
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:3000"));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();
        let config = ConfigFile::read_from(&bad);
        assert!(config.token.is_none());

        let config = ConfigFile::read_from(&dir.path().join("missing.json"));
        assert!(config.token.is_none());
    }

    #[tokio::test]
    async fn a_source_double_drives_the_filter_pipeline() {
        use crate::filter::{filter_records, parse_timestamp};
        use crate::types::{TimeRangeSelection, TransactionRecord};

        struct FixtureSource;

        #[async_trait]
        impl StatisticsSource for FixtureSource {
            async fn fetch_statistics(&self, token: &str) -> Result<StatisticsResponse, ApiError> {
                if token != "valid" {
                    return Err(ApiError::MissingCredential);
                }
                Ok(StatisticsResponse {
                    transaksi: vec![
                        TransactionRecord::at("2024-06-15T08:30:00"),
                        TransactionRecord::at("2024-06-01T08:30:00"),
                    ],
                    total_transaksi: 2,
                })
            }
        }

        let stats = FixtureSource.fetch_statistics("valid").await.unwrap();
        let now = parse_timestamp("2024-06-15T10:00:00").unwrap();
        let filtered = filter_records(&stats.transaksi, TimeRangeSelection::Today, now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(stats.total_transaksi, 2);
    }

    #[test]
    fn statistics_url_normalizes_trailing_slash() {
        let client = BackendClient::new("http://localhost:3000/");
        assert_eq!(
            client.statistics_url(),
            "http://localhost:3000/api/statistic/transaksi"
        );
    }
}
