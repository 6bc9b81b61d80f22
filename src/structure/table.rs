//! Coverage table synthesis.

use super::CompiledVocabulary;
use crate::model::{CoverageTable, Outline};
use crate::render::markdown;

/// Builds a services × plans table from an outline.
pub struct TableSynthesizer<'v> {
    vocabulary: &'v CompiledVocabulary,
}

impl<'v> TableSynthesizer<'v> {
    pub fn new(vocabulary: &'v CompiledVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Collect distinct row and column labels from the case-folded
    /// outline lines, in first-seen order.
    ///
    /// Returns `None` unless both axes are non-empty.
    pub fn synthesize(&self, outline: &Outline) -> Option<CoverageTable> {
        let mut services: Vec<String> = Vec::new();
        let mut plans: Vec<String> = Vec::new();

        for line in outline.lines() {
            let lower = line.trim().to_lowercase();
            if lower.is_empty() {
                continue;
            }
            if self.vocabulary.is_table_service(&lower) && !services.contains(&lower) {
                services.push(lower.clone());
            }
            if self.vocabulary.is_plan_column(&lower) && !plans.contains(&lower) {
                plans.push(lower);
            }
        }

        CoverageTable::new(services, plans, self.vocabulary.table_marker())
    }

    /// Render the coverage table section, or an empty string when no
    /// table can be built.
    pub fn synthesize_markdown(&self, outline: &Outline) -> String {
        match self.synthesize(outline) {
            Some(table) => markdown::render_coverage_table(
                &table,
                self.vocabulary.table_heading(),
                self.vocabulary.table_service_label(),
            ),
            None => String::new(),
        }
    }
}
