//! Entry selection policy shared by the thumbnail extractor and the
//! full-image loader.
//!
//! Entries are processed in ascending bytewise order of their names,
//! regardless of how the container stored them. An entry qualifies when
//! it is a file (no trailing `/`), its final path segment does not carry
//! the hidden-metadata prefix, and its extension is in the supported
//! image set.

use camino::Utf8Path;

use zs_core::MediaType;

/// Filename prefix used by macOS for sidecar metadata entries (`._foo`).
///
/// Such entries are never image candidates, independent of where they
/// land in sort order.
const HIDDEN_METADATA_PREFIX: &str = "._";

/// Sorts entry names and keeps only qualifying image entries.
///
/// The returned order is the definitive presentation order: the first
/// element is the thumbnail candidate, and the full-image loader emits
/// decoded images in exactly this order.
pub(crate) fn select_image_entries(mut names: Vec<String>) -> Vec<String> {
    names.sort_unstable();
    names.retain(|name| is_image_entry(name));
    names
}

/// Infers the media type of an entry from its extension.
///
/// Returns `None` for entries without a supported image extension.
pub(crate) fn media_type_for(name: &str) -> Option<MediaType> {
    Utf8Path::new(name)
        .extension()
        .and_then(MediaType::from_extension)
}

/// Checks whether an entry name qualifies as an image candidate.
fn is_image_entry(name: &str) -> bool {
    // Directory entries use a trailing slash in zip containers.
    if name.ends_with('/') {
        return false;
    }

    let final_segment = name.rsplit('/').next().unwrap_or(name);
    if final_segment.starts_with(HIDDEN_METADATA_PREFIX) {
        return false;
    }

    media_type_for(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_is_image_entry_extensions() {
        assert!(is_image_entry("cover.jpg"));
        assert!(is_image_entry("pages/001.JPEG"));
        assert!(is_image_entry("a.png"));
        assert!(is_image_entry("b.gif"));
        assert!(is_image_entry("c.WEBP"));
        assert!(!is_image_entry("notes.txt"));
        assert!(!is_image_entry("archive.zip"));
        assert!(!is_image_entry("noextension"));
    }

    #[test]
    fn test_is_image_entry_excludes_directories() {
        assert!(!is_image_entry("pages/"));
        assert!(!is_image_entry("pages/png/"));
    }

    #[test]
    fn test_is_image_entry_excludes_hidden_metadata() {
        assert!(!is_image_entry("._cover.png"));
        assert!(!is_image_entry("pages/._001.jpg"));
        // The prefix only applies to the final segment.
        assert!(is_image_entry("._meta/real.png"));
    }

    #[test]
    fn test_select_sorts_bytewise_then_filters() {
        let selected = select_image_entries(names(&[
            "z.png",
            "pages/b.jpg",
            "a.txt",
            "._meta.png",
            "pages/",
            "B.png",
        ]));
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(selected, vec!["B.png", "pages/b.jpg", "z.png"]);
    }

    #[test]
    fn test_media_type_for() {
        assert_eq!(media_type_for("pages/001.jpg"), Some(MediaType::Jpeg));
        assert_eq!(media_type_for("cover.WEBP"), Some(MediaType::Webp));
        assert_eq!(media_type_for("readme"), None);
    }
}
