//! # unscan
//!
//! Multi-source text reconstruction for PDFs and scanned images.
//!
//! Native PDF text is recovered in reading order, pages with too little of
//! it are rasterized and run through OCR, and the merged text is cleaned,
//! normalized and classified into a Markdown outline with an optional
//! service-by-plan coverage table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unscan::{Pipeline, PipelineOptions};
//!
//! fn main() -> unscan::Result<()> {
//!     let pipeline = Pipeline::new(PipelineOptions::default())?;
//!     let result = pipeline.process_file("coverage.pdf");
//!
//!     if result.is_success() {
//!         println!("{}", result.text);
//!     } else {
//!         eprintln!("{}", result.error.unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Spatial extraction**: text fragments ordered top-to-bottom per page
//! - **OCR fallback**: `pdftoppm` + `tesseract` for pages without usable text
//! - **Cleanup pipeline**: artifact removal and Unicode normalization
//! - **Heuristic structure**: titles, sections, services and plan markers
//! - **Parallel batches**: independent documents processed with Rayon

pub mod detect;
pub mod error;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod structure;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use detect::{detect_kind, detect_kind_from_path, FileKind};
pub use error::{Error, Result};
pub use model::{
    CoverageTable, Document, Outline, OutlineNode, Page, PageQuality, PositionedFragment,
};
pub use ocr::{PdftoppmRasterizer, Rasterizer, Recognizer, TesseractRecognizer};
pub use parser::{Config, PageSelection, PageTextSource, PipelineOptions};
pub use pipeline::{MergePolicy, Pipeline, QualityGate, RenderedText};
pub use render::{
    CleanupOptions, CleanupPreset, ExtractionResult, JsonFormat, PageReport, Status,
};
pub use structure::{StructuredSummary, Vocabulary};

#[cfg(feature = "async")]
pub use pipeline::process_bytes_async;

use std::path::Path;

/// Process input bytes with the default pipeline.
///
/// Never fails: errors, including a missing OCR toolchain at construction,
/// are reported in the returned [`ExtractionResult`].
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("coverage.pdf").unwrap();
/// let result = unscan::process_bytes(&data);
/// println!("{} pages", result.pages_processed);
/// ```
pub fn process_bytes(data: &[u8]) -> ExtractionResult {
    match Pipeline::new(PipelineOptions::default()) {
        Ok(pipeline) => pipeline.process_bytes(data),
        Err(e) => ExtractionResult::failure(&e, None),
    }
}

/// Read and process a file with the default pipeline.
///
/// # Example
///
/// ```no_run
/// let result = unscan::process_file("scan.png");
/// assert!(result.is_success());
/// ```
pub fn process_file<P: AsRef<Path>>(path: P) -> ExtractionResult {
    match std::fs::read(path) {
        Ok(data) => process_bytes(&data),
        Err(e) => ExtractionResult::failure(&Error::Io(e), None),
    }
}

/// Reconstructed Markdown for a file, or the error that prevented it.
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let result = process_file(path);
    match result.error {
        None => Ok(result.text),
        Some(message) => Err(Error::Render(message)),
    }
}
