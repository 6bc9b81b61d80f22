//! Native/OCR merge policy.

/// Combines native and OCR text for one page.
///
/// Short native text is kept first, followed by the separator and the OCR
/// text. Long native text wins outright.
#[derive(Debug, Clone)]
pub struct MergePolicy {
    threshold_chars: usize,
    separator: String,
}

impl MergePolicy {
    pub fn new(threshold_chars: usize, separator: impl Into<String>) -> Self {
        Self {
            threshold_chars,
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn merge(&self, native: &str, ocr: &str) -> String {
        let native_chars = native.trim().chars().count();
        let has_ocr = !ocr.trim().is_empty();

        match (native_chars > 0, has_ocr) {
            (false, false) => String::new(),
            (true, false) => native.to_string(),
            (false, true) => ocr.to_string(),
            (true, true) if native_chars < self.threshold_chars => {
                format!("{}{}{}", native, self.separator, ocr)
            }
            (true, true) => native.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> MergePolicy {
        MergePolicy::new(50, "\n\n--- OCR ---\n\n")
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(policy().merge("  ", "\n"), "");
    }

    #[test]
    fn test_one_side_only() {
        assert_eq!(policy().merge("", "ocr text"), "ocr text");
        assert_eq!(policy().merge("native", "  "), "native");
    }

    #[test]
    fn test_short_native_keeps_both() {
        let native = "n".repeat(10);
        let ocr = "o".repeat(200);
        let merged = policy().merge(&native, &ocr);
        assert!(merged.starts_with(&native));
        assert!(merged.ends_with(&ocr));
        let sep = merged.find("--- OCR ---").unwrap();
        assert!(sep > native.len() - 1 && sep < merged.find(&ocr).unwrap());
    }

    #[test]
    fn test_long_native_wins() {
        let native = "n".repeat(300);
        let ocr = "o".repeat(50);
        assert_eq!(policy().merge(&native, &ocr), native);
    }
}
