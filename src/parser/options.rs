//! Pipeline options and configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::error::{Error, Result};
use crate::render::CleanupOptions;
use crate::structure::Vocabulary;

/// Tunable thresholds for the reconstruction pipeline.
///
/// The defaults are the observed behavior, not tuned optima.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Native text shorter than this (trimmed chars) triggers OCR
    pub ocr_trigger_chars: usize,

    /// Rasterization resolution
    pub raster_dpi: u32,

    /// Native text shorter than this is kept alongside OCR text
    pub merge_threshold_chars: usize,

    /// Language hint passed to the recognizer
    pub ocr_language: String,

    /// Marker placed between native and OCR text when both are kept
    pub ocr_separator: String,

    /// Cleanup passes
    pub cleanup: CleanupOptions,

    /// Page selection (which pages to process)
    #[serde(skip)]
    pub pages: PageSelection,
}

impl PipelineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the OCR trigger threshold.
    pub fn with_ocr_trigger_chars(mut self, chars: usize) -> Self {
        self.ocr_trigger_chars = chars;
        self
    }

    /// Set rasterization DPI.
    pub fn with_raster_dpi(mut self, dpi: u32) -> Self {
        self.raster_dpi = dpi;
        self
    }

    /// Set the merge threshold.
    pub fn with_merge_threshold_chars(mut self, chars: usize) -> Self {
        self.merge_threshold_chars = chars;
        self
    }

    /// Set the OCR language hint (e.g. "por", "eng").
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }

    /// Set the native/OCR separator marker.
    pub fn with_ocr_separator(mut self, separator: impl Into<String>) -> Self {
        self.ocr_separator = separator.into();
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, selection: PageSelection) -> Self {
        self.pages = selection;
        self
    }

    /// Check values that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.raster_dpi == 0 {
            return Err(Error::Config("raster_dpi must be positive".to_string()));
        }
        if self.ocr_language.trim().is_empty() {
            return Err(Error::Config("ocr_language must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ocr_trigger_chars: 100,
            raster_dpi: 300,
            merge_threshold_chars: 50,
            ocr_language: "por".to_string(),
            ocr_separator: "\n\n--- OCR ---\n\n".to_string(),
            cleanup: CleanupOptions::default(),
            pages: PageSelection::All,
        }
    }
}

/// Most pages a comma-separated selection may expand to.
pub const MAX_LISTED_PAGES: u64 = 100_000;

/// Page selection for processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidPageRange(s.to_string());

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| invalid())?;
                let end: u32 = end.trim().parse().map_err(|_| invalid())?;
                if start == 0 || start > end {
                    return Err(invalid());
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut ranges: Vec<(u32, u32)> = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((a, b)) => (
                    a.trim().parse::<u32>().map_err(|_| invalid())?,
                    b.trim().parse::<u32>().map_err(|_| invalid())?,
                ),
                None => {
                    let p = part.parse::<u32>().map_err(|_| invalid())?;
                    (p, p)
                }
            };
            if start == 0 || start > end {
                return Err(invalid());
            }
            ranges.push((start, end));
        }

        // Merge overlapping and adjacent ranges.
        ranges.sort_unstable();
        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
        for (start, end) in ranges {
            match merged.last_mut() {
                Some(last) if start <= last.1.saturating_add(1) => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }

        if let [(start, end)] = merged[..] {
            return Ok(PageSelection::Range(start..=end));
        }

        let total: u64 = merged
            .iter()
            .map(|(start, end)| u64::from(end - start) + 1)
            .sum();
        if total > MAX_LISTED_PAGES {
            return Err(Error::InvalidPageRange(format!(
                "{} lists {} pages (limit {})",
                s, total, MAX_LISTED_PAGES
            )));
        }

        let pages: BTreeSet<u32> = merged
            .into_iter()
            .flat_map(|(start, end)| start..=end)
            .collect();
        Ok(PageSelection::Pages(pages.into_iter().collect()))
    }
}

/// Full configuration file: pipeline thresholds plus vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineOptions,
    pub vocabulary: Vocabulary,
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
