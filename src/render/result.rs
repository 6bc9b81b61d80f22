//! Extraction result object.

use serde::{Deserialize, Serialize};

use crate::detect::FileKind;
use crate::error::Error;
use crate::model::{Document, PageQuality};
use crate::structure::StructuredSummary;

/// Outcome of a document run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Per-page diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    /// Page number (1-indexed)
    pub number: u32,

    /// Gate classification
    pub quality: PageQuality,

    /// Whether OCR ran for this page
    pub ocr_invoked: bool,

    /// Characters of resolved text (trimmed)
    pub chars: usize,
}

/// The result object handed to callers.
///
/// Failures are reported through `status` and `error`; `text` is empty
/// whenever `status` is `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub status: Status,

    /// Final structured markdown
    pub text: String,

    /// Concatenated page text before cleanup
    pub raw_text: String,

    /// Number of pages processed
    pub pages_processed: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Always "markdown"
    pub format: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileKind>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<PageReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<StructuredSummary>,
}

impl ExtractionResult {
    /// Successful result for a processed document.
    pub fn success(doc: &Document, text: String, raw_text: String) -> Self {
        Self {
            status: Status::Success,
            text,
            raw_text,
            pages_processed: doc.page_count(),
            error: None,
            format: "markdown".to_string(),
            file_type: Some(doc.kind()),
            pages: page_reports(doc),
            structure: None,
        }
    }

    /// Error result. Page reports are kept when a document was built.
    pub fn failure(err: &Error, doc: Option<&Document>) -> Self {
        Self {
            status: Status::Error,
            text: String::new(),
            raw_text: String::new(),
            pages_processed: doc.map_or(0, Document::page_count),
            error: Some(err.to_string()),
            format: "markdown".to_string(),
            file_type: doc.map(Document::kind),
            pages: doc.map(page_reports).unwrap_or_default(),
            structure: None,
        }
    }

    /// Attach a structured summary.
    pub fn with_structure(mut self, summary: StructuredSummary) -> Self {
        self.structure = Some(summary);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Number of pages that went through OCR.
    pub fn ocr_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.ocr_invoked).count()
    }
}

fn page_reports(doc: &Document) -> Vec<PageReport> {
    doc.pages()
        .iter()
        .filter_map(|page| {
            Some(PageReport {
                number: page.number(),
                quality: page.quality()?,
                ocr_invoked: page.ocr_invoked(),
                chars: page.text().map_or(0, |t| t.trim().chars().count()),
            })
        })
        .collect()
}
