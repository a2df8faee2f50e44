//! Error types for the zs-core crate.
//!
//! This module provides the [`StoreError`] type for failures in the
//! persisted key-value store.

use camino::Utf8PathBuf;

/// Errors that can occur while reading or writing the persisted store.
///
/// Store failures never abort a scan; the controller logs them and keeps
/// the in-memory result. They are surfaced directly only when a caller
/// explicitly reads the store back (e.g. the CLI `show` command).
///
/// # Examples
///
/// ```
/// use zs_core::StoreError;
/// use camino::Utf8PathBuf;
///
/// let error = StoreError::invalid_layout("previews", "expected an array");
/// assert!(error.to_string().contains("previews"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing the store file.
    #[error("store I/O error at {path}: {source}")]
    Io {
        /// The store file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The store file contents could not be parsed or serialized as JSON.
    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A persisted value does not have the expected shape.
    #[error("invalid persisted value for key '{key}': {reason}")]
    InvalidLayout {
        /// The key whose value is malformed.
        key: String,
        /// Explanation of the mismatch.
        reason: String,
    },
}

impl StoreError {
    /// Creates a new [`StoreError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`StoreError::InvalidLayout`] error.
    #[inline]
    pub fn invalid_layout(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLayout {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
