//! Page rasterizer backed by `pdftoppm`.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use super::backend::Rasterizer;
use super::tools::check_binary;
use crate::error::{Error, Result};

/// Rasterizer that renders single PDF pages to PNG.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: String,
}

impl PdftoppmRasterizer {
    pub fn new() -> Self {
        Self {
            binary: "pdftoppm".to_string(),
        }
    }

    /// Use a specific pdftoppm executable.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        check_binary(&self.binary)
    }

    fn render(&self, pdf_path: &Path, page: u32, dpi: u32, output_dir: &Path) -> Result<PathBuf> {
        let page_str = page.to_string();
        let dpi_str = dpi.to_string();
        let output_prefix = output_dir.join("page");

        let output = Command::new(&self.binary)
            .args(["-png", "-r", &dpi_str, "-f", &page_str, "-l", &page_str])
            .arg(pdf_path)
            .arg(&output_prefix)
            .output();

        match output {
            Ok(o) if o.status.success() => find_page_image(output_dir, page)
                .ok_or_else(|| Error::Rasterize(format!("No image generated for page {}", page))),
            Ok(o) => Err(Error::Rasterize(format!(
                "pdftoppm failed on page {}: {}",
                page,
                String::from_utf8_lossy(&o.stderr).trim()
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::ToolNotFound(
                "pdftoppm not found (install poppler-utils)".to_string(),
            )),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// pdftoppm zero-pads page numbers to the width of the page count.
fn find_page_image(dir: &Path, page: u32) -> Option<PathBuf> {
    [1, 2, 3, 4, 5]
        .iter()
        .map(|digits| dir.join(format!("page-{:0width$}.png", page, width = digits)))
        .find(|path| path.exists())
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(&self, document: &[u8], page: u32, dpi: u32) -> Result<Vec<u8>> {
        if document.is_empty() {
            return Err(Error::Rasterize("no document bytes to rasterize".to_string()));
        }

        let temp_dir = TempDir::new()?;
        let pdf_path = temp_dir.path().join("input.pdf");
        std::fs::write(&pdf_path, document)?;

        let image_path = self.render(&pdf_path, page, dpi, temp_dir.path())?;
        let image = std::fs::read(&image_path)?;
        log::debug!("Rasterized page {} at {} dpi ({} bytes)", page, dpi, image.len());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_page_image_padding() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("page-007.png"), b"x").unwrap();
        let found = find_page_image(dir.path(), 7).unwrap();
        assert!(found.ends_with("page-007.png"));
        assert!(find_page_image(dir.path(), 8).is_none());
    }

    #[test]
    fn test_missing_binary_is_tool_not_found() {
        let rasterizer = PdftoppmRasterizer::with_binary("unscan-no-such-pdftoppm");
        let err = rasterizer.rasterize(b"%PDF-1.4", 1, 300).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound(_)));
    }
}
