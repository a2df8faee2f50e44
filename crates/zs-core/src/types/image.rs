//! Image media types and the encoded data-URL wire format.
//!
//! An extracted archive entry is carried around as an [`EncodedImage`]:
//! a self-describing `data:<mime>;base64,<payload>` string that any
//! consumer (UI, CLI output, persisted store) can use directly.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// The closed set of image media types supported for extraction.
///
/// Inferred from an archive entry's file extension, never from content
/// sniffing. `jpg` normalizes to [`MediaType::Jpeg`].
///
/// # Examples
///
/// ```
/// use zs_core::MediaType;
///
/// assert_eq!(MediaType::from_extension("JPG"), Some(MediaType::Jpeg));
/// assert_eq!(MediaType::from_extension("webp"), Some(MediaType::Webp));
/// assert_eq!(MediaType::from_extension("txt"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// JPEG images (`.jpg`, `.jpeg`).
    Jpeg,
    /// PNG images (`.png`).
    Png,
    /// GIF images (`.gif`).
    Gif,
    /// WebP images (`.webp`).
    Webp,
}

impl MediaType {
    /// Infers a media type from a file extension, case-insensitively.
    ///
    /// Returns `None` for any extension outside the supported set.
    ///
    /// # Examples
    ///
    /// ```
    /// use zs_core::MediaType;
    ///
    /// assert_eq!(MediaType::from_extension("jpeg"), Some(MediaType::Jpeg));
    /// assert_eq!(MediaType::from_extension("Png"), Some(MediaType::Png));
    /// assert_eq!(MediaType::from_extension("bmp"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Returns the MIME type string for this media type.
    ///
    /// # Examples
    ///
    /// ```
    /// use zs_core::MediaType;
    ///
    /// assert_eq!(MediaType::Jpeg.mime(), "image/jpeg");
    /// ```
    #[inline]
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// A decoded image rendered as a self-describing data-URL string.
///
/// Wire format: `data:<mime>;base64,<payload>`. The newtype keeps the
/// string opaque to callers while serializing transparently, so a
/// persisted preview's `thumbnail` field is exactly this string (or null).
///
/// # Examples
///
/// ```
/// use zs_core::{EncodedImage, MediaType};
///
/// let image = EncodedImage::encode(MediaType::Png, &[0x89, 0x50]);
/// assert!(image.as_str().starts_with("data:image/png;base64,"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Encodes raw image bytes as a data URL with the given media type.
    #[must_use]
    pub fn encode(media: MediaType, bytes: &[u8]) -> Self {
        Self(format!(
            "data:{};base64,{}",
            media.mime(),
            STANDARD.encode(bytes)
        ))
    }

    /// Returns the full data-URL string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension_case_insensitive() {
        assert_eq!(MediaType::from_extension("jpg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_extension("JPG"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_extension("jpeg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_extension("PNG"), Some(MediaType::Png));
        assert_eq!(MediaType::from_extension("Gif"), Some(MediaType::Gif));
        assert_eq!(MediaType::from_extension("WEBP"), Some(MediaType::Webp));
    }

    #[test]
    fn test_media_type_from_extension_rejects_unknown() {
        assert_eq!(MediaType::from_extension("bmp"), None);
        assert_eq!(MediaType::from_extension("txt"), None);
        assert_eq!(MediaType::from_extension(""), None);
    }

    #[test]
    fn test_media_type_mime() {
        assert_eq!(MediaType::Jpeg.mime(), "image/jpeg");
        assert_eq!(MediaType::Png.mime(), "image/png");
        assert_eq!(MediaType::Gif.mime(), "image/gif");
        assert_eq!(MediaType::Webp.mime(), "image/webp");
    }

    #[test]
    fn test_encoded_image_wire_format() {
        let image = EncodedImage::encode(MediaType::Gif, b"GIF89a");
        assert_eq!(image.as_str(), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn test_encoded_image_empty_payload() {
        let image = EncodedImage::encode(MediaType::Png, &[]);
        assert_eq!(image.as_str(), "data:image/png;base64,");
    }

    #[test]
    fn test_encoded_image_serializes_as_plain_string() {
        let image = EncodedImage::encode(MediaType::Jpeg, &[0xFF, 0xD8]);
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, format!("\"{}\"", image.as_str()));

        let parsed: EncodedImage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, image);
    }
}
