//! Text extraction from images (OCR engine boundary)
//!
//! The gateway does not implement OCR itself; it shells out to the Tesseract
//! CLI. The engine is behind the [`TextExtractor`] trait so intent handling
//! can be exercised without the binary installed. A missing binary surfaces
//! as an extraction error at intent time, not at startup, so the other
//! capabilities keep working.

use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;

use crate::config::OcrConfig;
use crate::upload::UploadedImage;
use crate::{Error, Result};

/// Extracts printed text from an uploaded image
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Recognize printed text in the image
    ///
    /// Returns the recognized text, which may be empty when the image
    /// contains none.
    ///
    /// # Errors
    ///
    /// Returns error if the OCR engine cannot process the image
    async fn extract(&self, image: &UploadedImage) -> Result<String>;
}

/// Tesseract CLI OCR engine
pub struct TesseractOcr {
    binary: Option<PathBuf>,
    language: String,
}

impl TesseractOcr {
    /// Create an engine from configuration
    ///
    /// With no explicit path configured, the binary is looked up on PATH
    /// at extraction time.
    #[must_use]
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config.tesseract_path.clone(),
            language: config.language.clone(),
        }
    }

    /// Locate the tesseract binary
    fn resolve_binary(&self) -> Result<PathBuf> {
        match &self.binary {
            Some(path) if path.is_file() => Ok(path.clone()),
            Some(path) => Err(Error::Ocr(format!(
                "tesseract binary not found at {}",
                path.display()
            ))),
            None => which::which("tesseract")
                .map_err(|e| Error::Ocr(format!("tesseract binary not found: {e}"))),
        }
    }

    /// File extension tesseract expects for the MIME type
    fn extension_for(mime_type: &str) -> &'static str {
        match mime_type {
            "image/png" => "png",
            // uploads are validated to jpeg/png only
            _ => "jpg",
        }
    }
}

#[async_trait]
impl TextExtractor for TesseractOcr {
    async fn extract(&self, image: &UploadedImage) -> Result<String> {
        let binary = self.resolve_binary()?;

        // Tesseract reads from a file, so hand the payload over through a
        // temp file that lives until the process exits.
        let mut input = tempfile::Builder::new()
            .prefix("sightline-ocr-")
            .suffix(&format!(".{}", Self::extension_for(image.mime_type())))
            .tempfile()
            .map_err(|e| Error::Ocr(format!("failed to stage image: {e}")))?;
        input
            .write_all(image.data())
            .map_err(|e| Error::Ocr(format!("failed to stage image: {e}")))?;
        input
            .flush()
            .map_err(|e| Error::Ocr(format!("failed to stage image: {e}")))?;

        tracing::debug!(
            engine = %binary.display(),
            language = %self.language,
            bytes = image.len(),
            "running OCR"
        );

        let output = tokio::process::Command::new(&binary)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Ocr(format!("failed to run tesseract: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        tracing::debug!(chars = text.len(), "OCR complete");
        Ok(text)
    }
}
