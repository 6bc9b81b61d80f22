//! Tesseract recognizer.
//!
//! Uses the `tesseract` command-line tool; the image is written to a
//! scratch directory that is removed when recognition finishes.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use super::backend::Recognizer;
use super::tools::check_binary;
use crate::detect::{detect_kind, FileKind};
use crate::error::{Error, Result};

/// Recognizer backed by the `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: String,
}

impl TesseractRecognizer {
    pub fn new() -> Self {
        Self {
            binary: "tesseract".to_string(),
        }
    }

    /// Use a specific tesseract executable.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        check_binary(&self.binary)
    }

    fn run(&self, image_path: &Path, language: &str) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", language])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(Error::Ocr(format!("tesseract failed: {}", stderr.trim())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::ToolNotFound(
                "tesseract not found (install tesseract-ocr)".to_string(),
            )),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn image_extension(image: &[u8]) -> &'static str {
    match detect_kind(image) {
        Ok(FileKind::Jpeg) => "jpg",
        Ok(FileKind::Gif) => "gif",
        Ok(FileKind::Bmp) => "bmp",
        Ok(FileKind::Tiff) => "tif",
        _ => "png",
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &[u8], language: &str) -> Result<String> {
        if image.is_empty() {
            return Err(Error::Ocr("empty image".to_string()));
        }

        let temp_dir = TempDir::new()?;
        let image_path = temp_dir
            .path()
            .join(format!("page.{}", image_extension(image)));
        std::fs::write(&image_path, image)?;

        let text = self.run(&image_path, language)?;
        log::debug!("tesseract recognized {} chars", text.trim().chars().count());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(b"\xff\xd8\xff\xe0"), "jpg");
        assert_eq!(image_extension(b"\x89PNG"), "png");
        assert_eq!(image_extension(b"II*\x00"), "tif");
    }

    #[test]
    fn test_missing_binary_is_tool_not_found() {
        let recognizer = TesseractRecognizer::with_binary("unscan-no-such-tesseract");
        let err = recognizer.recognize(b"\x89PNG\r\n", "por").unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = TesseractRecognizer::new().recognize(b"", "por").unwrap_err();
        assert!(matches!(err, Error::Ocr(_)));
    }
}
