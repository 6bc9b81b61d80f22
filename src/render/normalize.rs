//! Lexical normalization of known OCR misspellings.

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::structure::Correction;

/// Applies a closed table of literal corrections.
///
/// Entries run longest key first (ties keep table order), each replaced
/// globally. A replacement can form a new key together with the text
/// around it, so passes repeat until the text stops changing. No entry's
/// output may contain a key, which rules out the trivial rewrite cycles.
#[derive(Debug, Clone)]
pub struct Normalizer {
    corrections: Vec<(String, String)>,
}

impl Normalizer {
    /// Validate and order a correction table.
    pub fn new(corrections: &[Correction]) -> Result<Self> {
        let mut table: Vec<(String, String)> = Vec::with_capacity(corrections.len());

        for c in corrections {
            let from: String = c.from.nfc().collect();
            let to: String = c.to.nfc().collect();
            if from.is_empty() {
                return Err(Error::Config("correction with empty key".to_string()));
            }
            if from == to {
                continue;
            }
            if table.iter().any(|(k, _)| *k == from) {
                return Err(Error::Config(format!("duplicate correction key {:?}", from)));
            }
            table.push((from, to));
        }

        for (_, to) in &table {
            if let Some((key, _)) = table.iter().find(|(k, _)| to.contains(k.as_str())) {
                return Err(Error::Config(format!(
                    "correction output {:?} contains key {:?}",
                    to, key
                )));
            }
        }

        // Stable: equal lengths keep table order.
        table.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        Ok(Self { corrections: table })
    }

    /// Apply the table until no key remains.
    pub fn apply(&self, text: &str) -> String {
        let max_passes = text.chars().count() + self.corrections.len() + 1;
        let mut result = text.to_string();

        for _ in 0..max_passes {
            match self.apply_pass(&result) {
                Some(next) => result = next,
                None => return result,
            }
        }

        log::warn!(
            "Corrections did not settle after {} passes; output may change on reapplication",
            max_passes
        );
        result
    }

    /// One pass over the table; `None` when nothing matched.
    fn apply_pass(&self, text: &str) -> Option<String> {
        let mut result: Option<String> = None;
        for (from, to) in &self.corrections {
            let current = result.as_deref().unwrap_or(text);
            if current.contains(from.as_str()) {
                result = Some(current.replace(from.as_str(), to));
            }
        }
        result
    }

    /// Number of active entries.
    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}
