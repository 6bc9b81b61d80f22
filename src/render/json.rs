//! JSON rendering for extraction results.

use super::ExtractionResult;
use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a result object to JSON.
pub fn to_json(result: &ExtractionResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_pretty() {
        let result = ExtractionResult::failure(&Error::EmptyResult, None);
        let json = to_json(&result, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"status\": \"error\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let result = ExtractionResult::failure(&Error::EmptyResult, None);
        let json = to_json(&result, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
    }
}
