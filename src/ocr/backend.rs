//! Capability traits consumed by the OCR fallback.

use crate::error::Result;

/// Page-to-image capability.
pub trait Rasterizer: Send + Sync {
    /// Render one page (1-indexed) of a document to image bytes.
    fn rasterize(&self, document: &[u8], page: u32, dpi: u32) -> Result<Vec<u8>>;
}

/// Image-to-text capability.
pub trait Recognizer: Send + Sync {
    /// Recognize text in an encoded image.
    fn recognize(&self, image: &[u8], language: &str) -> Result<String>;
}

impl<T: Rasterizer + ?Sized> Rasterizer for Box<T> {
    fn rasterize(&self, document: &[u8], page: u32, dpi: u32) -> Result<Vec<u8>> {
        (**self).rasterize(document, page, dpi)
    }
}

impl<T: Recognizer + ?Sized> Recognizer for Box<T> {
    fn recognize(&self, image: &[u8], language: &str) -> Result<String> {
        (**self).recognize(image, language)
    }
}
