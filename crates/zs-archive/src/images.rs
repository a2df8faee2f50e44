//! Full-archive image extraction: every qualifying entry, in order.

use camino::Utf8Path;
use rayon::prelude::*;
use tracing::{debug, warn};

use zs_core::EncodedImage;

use crate::entries::{media_type_for, select_image_entries};
use crate::reader::ArchiveReader;

/// Extracts every qualifying image from one archive on disk.
///
/// Returns an empty sequence when the file cannot be read or parsed;
/// failures never propagate.
#[must_use]
pub fn load_all_images(path: &Utf8Path) -> Vec<EncodedImage> {
    let bytes = match std::fs::read(path.as_std_path()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path, error = %e, "Archive unreadable, no images");
            return Vec::new();
        }
    };

    all_images_from_bytes(&bytes)
}

/// Extracts every qualifying image from archive bytes.
///
/// Entry selection and ordering match the thumbnail extractor, so a
/// non-empty result always starts with the thumbnail image. Entries
/// decode in parallel, each task over its own reader view of the shared
/// bytes; the output is assembled in the sorted-name order computed
/// before decoding, never in completion order. An entry that fails to
/// decode is omitted and the rest of the archive still extracts.
#[must_use]
pub fn all_images_from_bytes(bytes: &[u8]) -> Vec<EncodedImage> {
    let reader = match ArchiveReader::open(bytes) {
        Ok(reader) => reader,
        Err(e) => {
            debug!(error = %e, "Not a readable archive, no images");
            return Vec::new();
        }
    };

    let candidates = select_image_entries(reader.entry_names());
    drop(reader);

    candidates
        .par_iter()
        .filter_map(|name| decode_entry(bytes, name))
        .collect()
}

/// Decodes one entry through a private reader over the shared bytes.
fn decode_entry(bytes: &[u8], name: &str) -> Option<EncodedImage> {
    let media = media_type_for(name)?;
    let mut reader = ArchiveReader::open(bytes).ok()?;

    match reader.read_entry(name) {
        Ok(data) => Some(EncodedImage::encode(media, &data)),
        Err(e) => {
            warn!(entry = %name, error = %e, "Entry decode failed, omitting image");
            None
        }
    }
}
