//! Unified error types for the cache layer.

use std::fmt::Display;
use thiserror::Error;

/// Unified error type for all cache operations.
///
/// A [`CacheError::Miss`] is an expected, recoverable outcome that callers
/// branch on; every other variant reports a real failure. The cache layer
/// performs no automatic retries.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No value stored at the requested key.
    #[error("no value found for key '{key}'")]
    Miss {
        /// The fully rendered store key that was looked up.
        key: String,
    },

    /// The backing store failed while reading a key.
    #[error("store read failed for key '{key}': {message}")]
    StoreRead { key: String, message: String },

    /// The backing store failed while writing a key.
    #[error("store write failed for key '{key}': {message}")]
    StoreWrite { key: String, message: String },

    /// A key scan failed; the bulk operation that issued it is rejected as a
    /// whole.
    #[error("scan failed for pattern '{pattern}': {message}")]
    Scan { pattern: String, message: String },

    /// A value could not be encoded for storage.
    #[error("failed to encode value for key '{key}': {message}")]
    Serialization { key: String, message: String },

    /// A stored payload could not be decoded as the expected type.
    #[error("failed to decode cached value for key '{key}': {message}")]
    Deserialization { key: String, message: String },

    /// Pool or connection setup problem.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Registry misuse, e.g. requesting a memoized cache under a different
    /// codec type. A caller programming error, not a runtime condition.
    #[error("registry error: {0}")]
    Registry(String),
}

impl CacheError {
    /// Creates a miss for the given rendered key.
    #[must_use]
    pub fn miss(key: impl Into<String>) -> Self {
        Self::Miss { key: key.into() }
    }

    /// Creates a store read error with key context.
    #[must_use]
    pub fn store_read(key: impl Into<String>, source: impl Display) -> Self {
        Self::StoreRead {
            key: key.into(),
            message: source.to_string(),
        }
    }

    /// Creates a store write error with key context.
    #[must_use]
    pub fn store_write(key: impl Into<String>, source: impl Display) -> Self {
        Self::StoreWrite {
            key: key.into(),
            message: source.to_string(),
        }
    }

    /// Creates a scan error with pattern context.
    #[must_use]
    pub fn scan(pattern: impl Into<String>, source: impl Display) -> Self {
        Self::Scan {
            pattern: pattern.into(),
            message: source.to_string(),
        }
    }

    /// Creates a serialization error with key context.
    #[must_use]
    pub fn serialization(key: impl Into<String>, source: impl Display) -> Self {
        Self::Serialization {
            key: key.into(),
            message: source.to_string(),
        }
    }

    /// Creates a deserialization error with key context.
    #[must_use]
    pub fn deserialization(key: impl Into<String>, source: impl Display) -> Self {
        Self::Deserialization {
            key: key.into(),
            message: source.to_string(),
        }
    }

    /// Returns true for a cache miss, the one outcome callers are expected
    /// to recover from.
    #[must_use]
    pub const fn is_miss(&self) -> bool {
        matches!(self, Self::Miss { .. })
    }

    /// Returns true if this error came from the store transport and a retry
    /// by the caller could plausibly succeed.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::StoreRead { .. } | Self::StoreWrite { .. } | Self::Scan { .. }
        )
    }
}
