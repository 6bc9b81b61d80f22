//! Extraction-quality gate.

use crate::model::PageQuality;

/// Decides per page whether native text can be trusted.
#[derive(Debug, Clone, Copy)]
pub struct QualityGate {
    trigger_chars: usize,
}

impl QualityGate {
    /// Native text with fewer trimmed characters than `trigger_chars`
    /// is insufficient.
    pub fn new(trigger_chars: usize) -> Self {
        Self { trigger_chars }
    }

    /// Classify a page's native text; `None` means there is no text layer.
    pub fn classify(&self, native: Option<&str>) -> PageQuality {
        match native {
            None => PageQuality::NativeAbsent,
            Some(text) if text.trim().chars().count() < self.trigger_chars => {
                PageQuality::NativeInsufficient
            }
            Some(_) => PageQuality::NativeSufficient,
        }
    }
}
