//! Client configuration loaded from TOML.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::read_type::ReadType;
use crate::{Error, Result};

/// Configuration shared by workers and tooling that talk to the master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Master RPC address as `ip:port`.
    #[serde(default = "default_master_address")]
    pub master_address: String,

    /// Read type used when a caller does not pick one.
    #[serde(default)]
    pub default_read_type: ReadType,

    /// `tracing_subscriber::EnvFilter` directive used by the binaries when
    /// `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Retry policy for master RPCs.
    // Must stay the last field: TOML tables follow plain keys.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Exponential backoff policy for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Upper bound on a single delay, jitter excluded.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Random extra delay in `0..=jitter_ms` added to each backoff.
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            master_address: default_master_address(),
            default_read_type: ReadType::default(),
            log_filter: default_log_filter(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl Configuration {
    /// Parse and validate a TOML document. Absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlParseFailed` for malformed TOML and
    /// `Error::InvalidConfig` if validation fails.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| Error::toml_parse_failed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileReadFailed` if the file cannot be read, otherwise
    /// the errors of [`Configuration::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::file_read_failed(path, e.to_string()))?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), master = %config.master_address, "loaded configuration");
        Ok(config)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializeFailed` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::serialize_failed("TOML", e.to_string()))
    }

    /// Master address as a socket address.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the address is not `ip:port`.
    pub fn master_socket_addr(&self) -> Result<SocketAddr> {
        self.master_address.parse().map_err(|e| {
            Error::invalid_config(format!(
                "master_address '{}' is not ip:port: {e}",
                self.master_address
            ))
        })
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.master_socket_addr()?;
        self.retry.validate()
    }
}

impl RetryConfig {
    /// Validate the policy.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `max_attempts` is zero or the base
    /// backoff exceeds the maximum.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::invalid_config("retry.max_attempts must be at least 1"));
        }
        if self.base_backoff_ms > self.max_backoff_ms {
            return Err(Error::invalid_config(format!(
                "retry.base_backoff_ms ({}) exceeds retry.max_backoff_ms ({})",
                self.base_backoff_ms, self.max_backoff_ms
            )));
        }
        Ok(())
    }

    /// Backoff before retry number `attempt` (zero-based): `base * 2^attempt`, capped.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let delay = self
            .base_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(delay.min(self.max_backoff_ms))
    }
}

fn default_master_address() -> String {
    "127.0.0.1:19998".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

const fn default_max_attempts() -> u32 {
    5
}

const fn default_base_backoff_ms() -> u64 {
    100
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

const fn default_jitter_ms() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Configuration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.default_read_type, ReadType::Cache);
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = Configuration::from_toml_str("").unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_partial_retry_table_keeps_other_defaults() {
        let config = Configuration::from_toml_str(
            r#"
            master_address = "10.0.0.7:29998"
            default_read_type = "CACHE_PROMOTE"

            [retry]
            max_attempts = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.master_address, "10.0.0.7:29998");
        assert_eq!(config.default_read_type, ReadType::CachePromote);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.base_backoff_ms, 100);
    }

    #[test]
    fn test_bad_address_rejected() {
        let result = Configuration::from_toml_str(r#"master_address = "master""#);
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Configuration::from_toml_str("[retry]\nmax_attempts = 0");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_inverted_backoff_bounds_rejected() {
        let result =
            Configuration::from_toml_str("[retry]\nbase_backoff_ms = 10\nmax_backoff_ms = 5");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = Configuration::from_toml_str("master_address = ");
        assert!(matches!(result, Err(Error::TomlParseFailed { .. })));
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let retry = RetryConfig {
            max_attempts: 10,
            base_backoff_ms: 100,
            max_backoff_ms: 1_000,
            jitter_ms: 0,
        };
        assert_eq!(retry.backoff(0), Duration::from_millis(100));
        assert_eq!(retry.backoff(1), Duration::from_millis(200));
        assert_eq!(retry.backoff(3), Duration::from_millis(800));
        assert_eq!(retry.backoff(4), Duration::from_millis(1_000));
        assert_eq!(retry.backoff(u32::MAX), Duration::from_millis(1_000));
    }

    #[test]
    fn test_load_from_file_and_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "master_address = \"192.168.1.2:19998\"").expect("write config");

        let config = Configuration::load(file.path()).unwrap();
        assert_eq!(config.master_socket_addr().unwrap().port(), 19998);

        let rendered = config.to_toml_string().unwrap();
        assert_eq!(Configuration::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Configuration::load("/nonexistent/strata.toml");
        assert!(matches!(result, Err(Error::FileReadFailed { .. })));
    }
}
