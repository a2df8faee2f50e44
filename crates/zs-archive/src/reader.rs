//! Read-only view over one zip archive held in memory.
//!
//! The reader parses the container's central directory up front but
//! defers entry decompression until an entry is actually requested. It
//! never mutates the source bytes.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::error::ArchiveError;

/// Upper bound on the per-entry buffer reserved up front.
///
/// The declared entry size comes from the container and is untrusted; a
/// crafted header must not force a huge allocation before any data is
/// decompressed. The buffer still grows as needed during the read.
const MAX_ENTRY_PREALLOC: usize = 1 << 20;

/// Buffer capacity to reserve for an entry declaring `size` bytes.
fn prealloc_size(size: u64) -> usize {
    usize::try_from(size)
        .unwrap_or(MAX_ENTRY_PREALLOC)
        .min(MAX_ENTRY_PREALLOC)
}

/// A lazy, read-only view over the bytes of one archive file.
///
/// Entry listing comes from the central directory; entry contents are
/// decompressed on demand via [`read_entry`](Self::read_entry). Opening a
/// second reader over the same byte slice is cheap, which is how the
/// full-image loader decodes entries in parallel.
///
/// # Examples
///
/// ```ignore
/// let bytes = std::fs::read("vol1.zip")?;
/// let mut reader = ArchiveReader::open(&bytes)?;
/// for name in reader.entry_names() {
///     println!("{name}");
/// }
/// ```
#[derive(Debug)]
pub struct ArchiveReader<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> ArchiveReader<'a> {
    /// Opens a byte buffer as a zip container.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Corrupt`] when the bytes cannot be parsed
    /// as a valid container.
    pub fn open(bytes: &'a [u8]) -> Result<Self, ArchiveError> {
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(ArchiveError::Corrupt)?;
        Ok(Self { archive })
    }

    /// Returns the number of entries in the archive.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive contains no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Returns all entry names in container storage order.
    ///
    /// Directory entries carry a trailing `/` (zip convention). The order
    /// is whatever the container stored; callers needing determinism sort
    /// the result themselves.
    #[must_use]
    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(ToOwned::to_owned).collect()
    }

    /// Decompresses one entry and returns its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::EntryDecode`] when the entry is missing or
    /// its compressed data cannot be decoded.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|e| ArchiveError::entry_decode(name, e))?;

        let mut data = Vec::with_capacity(prealloc_size(entry.size()));
        entry
            .read_to_end(&mut data)
            .map_err(|e| ArchiveError::entry_decode(name, zip::result::ZipError::Io(e)))?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::archive_with;

    #[test]
    fn test_open_rejects_garbage() {
        let result = ArchiveReader::open(b"definitely not a zip file");
        assert!(matches!(result, Err(ArchiveError::Corrupt(_))));
    }

    #[test]
    fn test_open_rejects_truncated_archive() {
        let bytes = archive_with(&[("a.png", b"data")]);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(ArchiveReader::open(truncated).is_err());
    }

    #[test]
    fn test_entry_names_lists_files_and_directories() {
        let bytes = archive_with(&[("pages/", b""), ("pages/001.png", b"x"), ("info.txt", b"y")]);
        let reader = ArchiveReader::open(&bytes).unwrap();

        let mut names = reader.entry_names();
        names.sort_unstable();
        assert_eq!(names, vec!["info.txt", "pages/", "pages/001.png"]);
        assert_eq!(reader.len(), 3);
    }

    #[test]
    fn test_read_entry_roundtrip() {
        let bytes = archive_with(&[("pages/001.png", b"fake png bytes")]);
        let mut reader = ArchiveReader::open(&bytes).unwrap();

        let data = reader.read_entry("pages/001.png").unwrap();
        assert_eq!(data, b"fake png bytes");
    }

    #[test]
    fn test_read_entry_missing_name() {
        let bytes = archive_with(&[("a.png", b"x")]);
        let mut reader = ArchiveReader::open(&bytes).unwrap();

        let err = reader.read_entry("b.png").unwrap_err();
        assert!(matches!(err, ArchiveError::EntryDecode { .. }));
    }

    #[test]
    fn test_prealloc_size_caps_declared_entry_size() {
        assert_eq!(prealloc_size(0), 0);
        assert_eq!(prealloc_size(128), 128);
        assert_eq!(prealloc_size(u64::MAX), MAX_ENTRY_PREALLOC);
        assert_eq!(
            prealloc_size(MAX_ENTRY_PREALLOC as u64 + 1),
            MAX_ENTRY_PREALLOC
        );
    }

    #[test]
    fn test_empty_archive() {
        let bytes = archive_with(&[]);
        let reader = ArchiveReader::open(&bytes).unwrap();
        assert!(reader.is_empty());
        assert!(reader.entry_names().is_empty());
    }
}
