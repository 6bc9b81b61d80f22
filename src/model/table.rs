//! Coverage table types.

use serde::{Deserialize, Serialize};

/// A services × plans coverage matrix.
///
/// Every cell holds the same affirmative marker: the outline carries no
/// information about which plan excludes which service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTable {
    /// Row labels, first-seen order.
    pub services: Vec<String>,

    /// Column labels, first-seen order.
    pub plans: Vec<String>,

    /// Cell value for every (service, plan) pair.
    pub marker: String,
}

impl CoverageTable {
    /// Build a table, or `None` when either axis is empty.
    pub fn new(services: Vec<String>, plans: Vec<String>, marker: impl Into<String>) -> Option<Self> {
        if services.is_empty() || plans.is_empty() {
            return None;
        }
        Some(Self {
            services,
            plans,
            marker: marker.into(),
        })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.services.len()
    }

    /// Get the number of plan columns.
    pub fn column_count(&self) -> usize {
        self.plans.len()
    }

    /// Cell value, or `None` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        (row < self.row_count() && col < self.column_count()).then_some(self.marker.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_both_axes() {
        assert!(CoverageTable::new(vec!["para-brisa".into()], vec![], "✓").is_none());
        assert!(CoverageTable::new(vec![], vec!["plano 1".into()], "✓").is_none());
    }

    #[test]
    fn test_cells_are_affirmative() {
        let table = CoverageTable::new(
            vec!["para-brisa".into(), "faróis".into()],
            vec!["plano 1".into(), "plano 2".into()],
            "✓",
        )
        .unwrap();
        assert_eq!(table.cell(1, 1), Some("✓"));
        assert_eq!(table.cell(2, 0), None);
    }
}
