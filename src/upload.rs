//! Image upload boundary
//!
//! An uploaded image is an opaque byte payload tagged with its MIME type.
//! It is immutable once constructed and lives for at most one session.

use crate::{Error, Result};

/// MIME types the gateway accepts for uploads
pub const SUPPORTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// An uploaded image payload with its MIME type
#[derive(Debug, Clone)]
pub struct UploadedImage {
    data: Vec<u8>,
    mime_type: String,
}

impl UploadedImage {
    /// Create an uploaded image from a payload and a declared MIME type
    ///
    /// # Errors
    ///
    /// Returns error if the payload is empty or the MIME type is not supported
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Result<Self> {
        let mime_type = mime_type.into();

        if data.is_empty() {
            return Err(Error::Upload("no file uploaded".to_string()));
        }

        // "image/jpg" shows up from some clients; normalize it
        let mime_type = if mime_type.eq_ignore_ascii_case("image/jpg") {
            "image/jpeg".to_string()
        } else {
            mime_type.to_ascii_lowercase()
        };

        if !SUPPORTED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(Error::Upload(format!(
                "unsupported image type: {mime_type} (expected image/jpeg or image/png)"
            )));
        }

        Ok(Self { data, mime_type })
    }

    /// Create an uploaded image by sniffing the payload's magic bytes
    ///
    /// Drag-and-drop clients occasionally omit the content type; JPEG and PNG
    /// are both recognizable from their signatures.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is empty or matches neither signature
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::Upload("no file uploaded".to_string()));
        }

        let mime_type = sniff_mime_type(&data)
            .ok_or_else(|| Error::Upload("unrecognized image data".to_string()))?;

        Self::new(data, mime_type)
    }

    /// Raw image bytes
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// MIME type tag (`image/jpeg` or `image/png`)
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Payload size in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty (never true for a constructed image)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Identify JPEG or PNG data from the file signature
fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else {
        None
    }
}
