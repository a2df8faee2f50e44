//! Per-archive preview records.
//!
//! A [`PreviewRecord`] is the unit the scan controller accumulates and
//! persists: one per discovered archive, in discovery order.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::image::EncodedImage;

/// Per-archive summary used for list rendering.
///
/// The serde layout is exactly the persisted wire shape:
/// `{ "path": string, "name": string, "thumbnail": string|null }`.
///
/// # Examples
///
/// ```
/// use zs_core::PreviewRecord;
/// use camino::Utf8Path;
///
/// let record = PreviewRecord::new(Utf8Path::new("/library/vol1.zip"), None);
/// assert_eq!(record.name, "vol1.zip");
/// assert!(!record.has_thumbnail());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRecord {
    /// Absolute path of the discovered archive.
    pub path: Utf8PathBuf,

    /// Display name: the final path segment.
    pub name: String,

    /// Representative image for the archive, or `None` when no entry
    /// qualified (or the archive could not be read). Consumers render a
    /// placeholder and disable the open action in that case.
    pub thumbnail: Option<EncodedImage>,
}

impl PreviewRecord {
    /// Creates a record for the given archive path, deriving the display
    /// name from the final path segment.
    #[must_use]
    pub fn new(path: impl AsRef<Utf8Path>, thumbnail: Option<EncodedImage>) -> Self {
        let path = path.as_ref().to_owned();
        let name = path.file_name().unwrap_or(path.as_str()).to_owned();
        Self {
            path,
            name,
            thumbnail,
        }
    }

    /// Returns `true` if a representative image was extracted.
    #[inline]
    #[must_use]
    pub const fn has_thumbnail(&self) -> bool {
        self.thumbnail.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MediaType;

    #[test]
    fn test_preview_record_name_is_final_segment() {
        let record = PreviewRecord::new(Utf8Path::new("/library/series/vol1.zip"), None);
        assert_eq!(record.path.as_str(), "/library/series/vol1.zip");
        assert_eq!(record.name, "vol1.zip");
    }

    #[test]
    fn test_preview_record_has_thumbnail() {
        let thumb = EncodedImage::encode(MediaType::Png, &[1, 2, 3]);
        let record = PreviewRecord::new(Utf8Path::new("/a.zip"), Some(thumb));
        assert!(record.has_thumbnail());
    }

    #[test]
    fn test_preview_record_null_thumbnail_wire_shape() {
        let record = PreviewRecord::new(Utf8Path::new("/library/empty.zip"), None);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": "/library/empty.zip",
                "name": "empty.zip",
                "thumbnail": null,
            })
        );
    }

    #[test]
    fn test_preview_record_roundtrip() {
        let record = PreviewRecord::new(
            Utf8Path::new("/library/vol1.zip"),
            Some(EncodedImage::encode(MediaType::Jpeg, &[0xFF, 0xD8])),
        );
        let json = serde_json::to_string(&record).unwrap();
        let parsed: PreviewRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
