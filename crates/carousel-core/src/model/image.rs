//! Embedded slide images.
//!
//! Uploaded files are stored inline on the slide as `data:` URIs; there is no separate asset store.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Image format of an embedded picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
}

impl ImageFormat {
    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Format for a MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Encode image bytes as a `data:` URI. Returns `None` if the bytes are not a supported image.
pub fn to_data_uri(data: &[u8]) -> Option<String> {
    let format = ImageFormat::from_magic_bytes(data)?;
    Some(format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data)))
}

/// Decode a base64 `data:` URI back into its format and bytes.
pub fn decode_data_uri(uri: &str) -> Option<(ImageFormat, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let format = ImageFormat::from_mime_type(mime)?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((format, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_magic_bytes(&PNG_MAGIC), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(b"%PDF-1.7"), None);
    }

    #[test]
    fn test_data_uri_roundtrip() {
        let uri = to_data_uri(&PNG_MAGIC).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let (format, bytes) = decode_data_uri(&uri).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(bytes, PNG_MAGIC);
    }

    #[test]
    fn test_rejects_unknown_bytes() {
        assert!(to_data_uri(b"plain text").is_none());
        assert!(decode_data_uri("https://example.com/a.png").is_none());
    }
}
