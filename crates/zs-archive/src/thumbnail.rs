//! Thumbnail extraction: one representative image per archive.

use camino::Utf8Path;
use tracing::{debug, warn};

use zs_core::EncodedImage;

use crate::entries::{media_type_for, select_image_entries};
use crate::reader::ArchiveReader;

/// Extracts the representative preview image for one archive on disk.
///
/// Failures of any kind (unreadable file, corrupt container, entry decode)
/// collapse to `None` with a logged warning; they never propagate, so a
/// broken archive costs one missing thumbnail, not a scan.
#[must_use]
pub fn generate_thumbnail(path: &Utf8Path) -> Option<EncodedImage> {
    let bytes = match std::fs::read(path.as_std_path()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path, error = %e, "Archive unreadable, skipping thumbnail");
            return None;
        }
    };

    thumbnail_from_bytes(&bytes)
}

/// Extracts the representative preview image from archive bytes.
///
/// Selection: all entry names sorted bytewise, directories and
/// hidden-metadata entries dropped, non-image extensions dropped; the
/// first remaining entry is decoded. If that one entry fails to decode,
/// the result is `None` — there is no fallback to the next candidate.
#[must_use]
pub fn thumbnail_from_bytes(bytes: &[u8]) -> Option<EncodedImage> {
    let mut reader = match ArchiveReader::open(bytes) {
        Ok(reader) => reader,
        Err(e) => {
            debug!(error = %e, "Not a readable archive, skipping thumbnail");
            return None;
        }
    };

    let candidates = select_image_entries(reader.entry_names());
    let first = candidates.first()?;
    let media = media_type_for(first)?;

    match reader.read_entry(first) {
        Ok(data) => Some(EncodedImage::encode(media, &data)),
        Err(e) => {
            warn!(entry = %first, error = %e, "Entry decode failed, no thumbnail");
            None
        }
    }
}
