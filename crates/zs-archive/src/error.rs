//! Error types for the zs-archive crate.
//!
//! This module provides the [`ArchiveError`] type for failures while
//! opening archives and decoding their entries.

/// Errors that can occur while reading an archive.
///
/// # Error Recovery Strategy
///
/// None of these errors abort a scan. The extraction entry points
/// ([`generate_thumbnail`](crate::generate_thumbnail),
/// [`load_all_images`](crate::load_all_images)) collapse them to
/// `None` / an empty sequence for the affected archive and log a warning;
/// only the lower-level [`ArchiveReader`](crate::ArchiveReader) surfaces
/// them to callers.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The byte stream could not be parsed as a valid zip container.
    #[error("corrupt archive: {0}")]
    Corrupt(#[source] zip::result::ZipError),

    /// A specific entry's compressed data could not be decoded.
    #[error("failed to decode entry '{name}': {source}")]
    EntryDecode {
        /// Name of the entry inside the archive.
        name: String,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },
}

impl ArchiveError {
    /// Creates a new [`ArchiveError::EntryDecode`] error.
    #[inline]
    pub fn entry_decode(name: impl Into<String>, source: zip::result::ZipError) -> Self {
        Self::EntryDecode {
            name: name.into(),
            source,
        }
    }
}
