//! Positioned text fragments produced by native extraction.

use serde::{Deserialize, Serialize};

/// A run of characters and its vertical offset on the page.
///
/// The offset grows downward from the top edge, so ascending offset is
/// top-to-bottom reading order. Fragments are immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedFragment {
    text: String,
    offset: f32,
}

impl PositionedFragment {
    /// Create a fragment at the given top-down offset.
    pub fn new(text: impl Into<String>, offset: f32) -> Self {
        Self {
            text: text.into(),
            offset,
        }
    }

    /// Create a fragment from a PDF user-space baseline (origin bottom-left).
    pub fn from_baseline(text: impl Into<String>, y: f32, page_height: f32) -> Self {
        Self::new(text, page_height - y)
    }

    /// Fragment text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Vertical offset from the top of the page.
    pub fn offset(&self) -> f32 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_baseline_flips_axis() {
        let top = PositionedFragment::from_baseline("top", 780.0, 792.0);
        let bottom = PositionedFragment::from_baseline("bottom", 72.0, 792.0);
        assert!(top.offset() < bottom.offset());
        assert_eq!(top.offset(), 12.0);
    }
}
