//! Page-level types.

use serde::{Deserialize, Serialize};

use super::PositionedFragment;
use crate::error::{Error, Result};

/// How trustworthy a page's native text layer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageQuality {
    /// Native text is long enough; OCR is skipped.
    NativeSufficient,
    /// Native text exists but is too short; OCR supplements it.
    NativeInsufficient,
    /// No text layer at all; OCR replaces it.
    NativeAbsent,
}

impl PageQuality {
    /// Whether this classification requires the OCR path.
    pub fn needs_ocr(self) -> bool {
        !matches!(self, PageQuality::NativeSufficient)
    }
}

/// A single source page.
#[derive(Debug, Clone)]
pub struct Page {
    number: u32,
    fragments: Option<Vec<PositionedFragment>>,
    raster: Option<Vec<u8>>,
    raster_attempted: bool,
    text: Option<String>,
    quality: Option<PageQuality>,
    ocr_invoked: bool,
}

impl Page {
    /// Create a page backed by a document container (raster produced on demand).
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fragments: None,
            raster: None,
            raster_attempted: false,
            text: None,
            quality: None,
            ocr_invoked: false,
        }
    }

    /// Create a page whose raster is already known, e.g. a standalone image.
    pub fn from_raster(number: u32, raster: Vec<u8>) -> Self {
        Self {
            raster: Some(raster),
            raster_attempted: true,
            ..Self::new(number)
        }
    }

    /// Page number (1-indexed).
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Native fragments; `None` when the page has no text layer.
    pub fn fragments(&self) -> Option<&[PositionedFragment]> {
        self.fragments.as_deref()
    }

    /// Record native fragments. An empty list counts as no text layer.
    pub fn set_fragments(&mut self, fragments: Option<Vec<PositionedFragment>>) {
        self.fragments = fragments.filter(|f| !f.is_empty());
    }

    /// Whether the raster for this page is already available.
    pub fn has_raster(&self) -> bool {
        self.raster.is_some()
    }

    /// Return the page raster, producing it at most once.
    ///
    /// A failed attempt is remembered; later calls do not retry and
    /// return `None`.
    pub fn raster_with<F>(&mut self, produce: F) -> Result<Option<&[u8]>>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        if !self.raster_attempted {
            self.raster_attempted = true;
            self.raster = Some(produce()?);
        }
        Ok(self.raster.as_deref())
    }

    /// Store the resolved text. Each page is resolved exactly once.
    pub fn resolve(&mut self, text: String, quality: PageQuality, ocr_invoked: bool) -> Result<()> {
        if self.text.is_some() {
            return Err(Error::PageAlreadyResolved(self.number));
        }
        self.text = Some(text);
        self.quality = Some(quality);
        self.ocr_invoked = ocr_invoked;
        Ok(())
    }

    /// Resolved text, if the page has been processed.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Quality classification, if the page has been processed.
    pub fn quality(&self) -> Option<PageQuality> {
        self.quality
    }

    /// Whether OCR ran for this page.
    pub fn ocr_invoked(&self) -> bool {
        self.ocr_invoked
    }

    /// Drop the raster once it is no longer needed.
    pub fn release_raster(&mut self) {
        self.raster = None;
    }
}
