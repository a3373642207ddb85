//! Configuration for the verification gate.
//!
//! One section, one required key:
//!
//! ```ron
//! (
//!     uri: "https://backend.example.org",
//!     retries: 3,
//!     retry_delay_ms: 5000,
//!     request_timeout_secs: 10,
//!     connect_timeout_secs: 5,
//! )
//! ```
//!
//! Everything except `uri` is optional. The struct is immutable once the
//! gate has been built from it.

use std::{path::Path, time::Duration};

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, policy::RetryPolicy};

/// Path of the thread search endpoint, relative to [`GatekeepConfig::uri`]
pub const SEARCH_PATH: &str = "/email/thread/search";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatekeepConfig {
    /// Base URI of the verification service, e.g. `http://backend:8080`.
    ///
    /// A single trailing `/` is ignored.
    #[serde(default)]
    pub uri: String,

    /// Attempts allowed after the first one, for retryable failures only.
    ///
    /// Default: 3 (4 attempts in total)
    #[serde(default = "defaults::retries")]
    pub retries: u32,

    /// Fixed wait between attempts.
    ///
    /// Default: 5000 milliseconds
    #[serde(default = "defaults::retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Upper bound on a single attempt, from connect to response headers.
    ///
    /// Default: 10 seconds
    #[serde(default = "defaults::request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on establishing the connection for a single attempt.
    ///
    /// Default: 5 seconds
    #[serde(default = "defaults::connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl GatekeepConfig {
    /// A configuration pointing at `uri`, with every optional key defaulted.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            retries: defaults::retries(),
            retry_delay_ms: defaults::retry_delay_ms(),
            request_timeout_secs: defaults::request_timeout_secs(),
            connect_timeout_secs: defaults::connect_timeout_secs(),
        }
    }

    /// Parse a RON configuration section.
    ///
    /// # Errors
    /// Returns an error if the text is not a valid section or fails
    /// [`validate`](Self::validate).
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a RON configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, or its contents are
    /// rejected by [`from_ron`](Self::from_ron).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_ron(&text)
    }

    /// Check the configuration can be used to build a gate.
    ///
    /// # Errors
    /// Returns an error if `uri` is missing, is not an absolute http(s)
    /// URL, or a timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint()?;

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfiguration {
                field: "request_timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfiguration {
                field: "connect_timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// The full URL verification requests are posted to.
    ///
    /// # Errors
    /// Returns an error if `uri` is empty or not an absolute http(s) URL.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let base = self.uri.trim();
        if base.is_empty() {
            return Err(ConfigError::MissingField("uri"));
        }

        let base = base.strip_suffix('/').unwrap_or(base);
        let url = Url::parse(&format!("{base}{SEARCH_PATH}")).map_err(|err| {
            ConfigError::InvalidConfiguration {
                field: "uri",
                reason: err.to_string(),
            }
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::InvalidConfiguration {
                field: "uri",
                reason: format!("unsupported scheme '{scheme}'"),
            }),
        }
    }

    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.retry_delay())
    }
}

mod defaults {
    pub const fn retries() -> u32 {
        3
    }

    pub const fn retry_delay_ms() -> u64 {
        5000
    }

    pub const fn request_timeout_secs() -> u64 {
        10
    }

    pub const fn connect_timeout_secs() -> u64 {
        5
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatekeepConfig::from_ron(r#"(uri: "http://localhost:8080")"#).unwrap();

        assert_eq!(config, GatekeepConfig::new("http://localhost:8080"));
        assert_eq!(config.retries, 3);
        assert_eq!(config.retry_delay(), Duration::from_millis(5000));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));

        let policy = config.retry_policy();
        assert_eq!(policy.retries, 3);
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn test_overrides() {
        let config = GatekeepConfig::from_ron(
            r#"(
                uri: "https://backend.example.org",
                retries: 1,
                retry_delay_ms: 250,
                request_timeout_secs: 2,
                connect_timeout_secs: 1,
            )"#,
        )
        .unwrap();

        assert_eq!(config.retries, 1);
        assert_eq!(config.retry_delay(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_secs(2));
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_uri() {
        assert!(matches!(
            GatekeepConfig::from_ron("(retries: 2)"),
            Err(ConfigError::MissingField("uri"))
        ));
        assert!(matches!(
            GatekeepConfig::new("   ").validate(),
            Err(ConfigError::MissingField("uri"))
        ));
    }

    #[test]
    fn test_unknown_field() {
        assert!(matches!(
            GatekeepConfig::from_ron(r#"(uri: "http://localhost", retry: 2)"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            GatekeepConfig::new("http://localhost:8080")
                .endpoint()
                .unwrap()
                .as_str(),
            "http://localhost:8080/email/thread/search"
        );
        assert_eq!(
            GatekeepConfig::new("https://backend.example.org/api/")
                .endpoint()
                .unwrap()
                .as_str(),
            "https://backend.example.org/api/email/thread/search"
        );
    }

    #[test]
    fn test_invalid_uri() {
        assert!(matches!(
            GatekeepConfig::new("not a uri").validate(),
            Err(ConfigError::InvalidConfiguration { field: "uri", .. })
        ));
        assert!(matches!(
            GatekeepConfig::new("ftp://backend.example.org").validate(),
            Err(ConfigError::InvalidConfiguration { field: "uri", .. })
        ));
    }

    #[test]
    fn test_zero_timeout() {
        let config = GatekeepConfig {
            request_timeout_secs: 0,
            ..GatekeepConfig::new("http://localhost")
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfiguration {
                field: "request_timeout_secs",
                ..
            })
        ));

        let config = GatekeepConfig {
            connect_timeout_secs: 0,
            ..GatekeepConfig::new("http://localhost")
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfiguration {
                field: "connect_timeout_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"(uri: "http://localhost:9000", retries: 0)"#).unwrap();

        let config = GatekeepConfig::from_file(file.path()).unwrap();
        assert_eq!(config.uri, "http://localhost:9000");
        assert_eq!(config.retries, 0);

        assert!(matches!(
            GatekeepConfig::from_file("/nonexistent/gatekeep.config.ron"),
            Err(ConfigError::Read { .. })
        ));
    }
}
