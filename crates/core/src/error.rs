//! Core error types for Strata operations.
//!
//! All errors are explicit, typed, and recoverable - no panics allowed.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for Strata operations.
#[derive(Debug, Error)]
pub enum Error {
    // I/O errors
    #[error("failed to read file '{path}': {reason}")]
    FileReadFailed { path: PathBuf, reason: String },

    // Parsing errors
    #[error("JSON parse error: {reason}")]
    JsonParseFailed { reason: String },

    #[error("TOML parse error: {reason}")]
    TomlParseFailed { reason: String },

    #[error("failed to serialize {format}: {reason}")]
    SerializeFailed {
        format: &'static str,
        reason: String,
    },

    // Configuration
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // Lineage and graph records
    #[error("invalid record: {reason}")]
    InvalidRecord { reason: String },

    // Master RPC
    #[error("failed to connect to {service} at {address}: {reason}")]
    ConnectionFailed {
        service: String,
        address: String,
        reason: String,
    },

    #[error("{service} call '{method}' failed: {reason}")]
    RpcFailed {
        service: String,
        method: String,
        reason: String,
    },

    // Generic I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a file read error.
    pub fn file_read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse_failed(reason: impl Into<String>) -> Self {
        Self::JsonParseFailed {
            reason: reason.into(),
        }
    }

    /// Create a TOML parse error.
    pub fn toml_parse_failed(reason: impl Into<String>) -> Self {
        Self::TomlParseFailed {
            reason: reason.into(),
        }
    }

    /// Create a serialization error for the named output format.
    pub fn serialize_failed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::SerializeFailed {
            format,
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an invalid record error.
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            reason: reason.into(),
        }
    }

    /// Create a connection failure error.
    pub fn connection_failed(
        service: impl Into<String>,
        address: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ConnectionFailed {
            service: service.into(),
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create an RPC failure error.
    pub fn rpc_failed(
        service: impl Into<String>,
        method: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::RpcFailed {
            service: service.into(),
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Whether retrying the operation could succeed.
    ///
    /// Only a dropped or refused connection is transient; everything else is
    /// a caller or server error that would fail the same way again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_is_retryable() {
        let err = Error::connection_failed("FileSystemMasterWorker", "127.0.0.1:19998", "refused");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_rpc_failed_is_not_retryable() {
        let err = Error::rpc_failed("FileSystemMasterWorker", "file_info", "no such file");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_serialize_failed_names_format() {
        let err = Error::serialize_failed("TOML", "unsupported value");
        assert_eq!(err.to_string(), "failed to serialize TOML: unsupported value");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::file_read_failed("/etc/strata.toml", "not found");
        let rendered = err.to_string();
        assert!(rendered.contains("/etc/strata.toml"));
        assert!(rendered.contains("not found"));
    }
}
