//! Section/service summary of an outline.

use serde::{Deserialize, Serialize};

use super::CompiledVocabulary;
use crate::model::{Outline, OutlineNode};

/// Services grouped under one section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub name: String,
    pub services: Vec<String>,
}

/// Compact view of the recovered structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSummary {
    /// Titles in document order.
    pub titles: Vec<String>,
    /// Sections in document order; repeated names stay separate.
    pub sections: Vec<SectionSummary>,
    /// Every service line, in document order.
    pub services: Vec<String>,
}

impl StructuredSummary {
    /// Summarize an outline.
    ///
    /// Service lines are picked by the vocabulary's summary keywords, not
    /// by the structurer's service patterns. A matching line joins the
    /// most recent section, even after an intervening title.
    pub fn from_outline(outline: &Outline, vocabulary: &CompiledVocabulary) -> Self {
        let mut summary = Self::default();
        let mut current: Option<usize> = None;

        for node in outline.nodes() {
            match node {
                OutlineNode::Section { name } => {
                    summary.sections.push(SectionSummary {
                        name: name.clone(),
                        services: Vec::new(),
                    });
                    current = Some(summary.sections.len() - 1);
                    continue;
                }
                OutlineNode::Title { text } => summary.titles.push(text.clone()),
                _ => {}
            }

            let text = node.text();
            if vocabulary.is_summary_service(text) {
                if let Some(idx) = current {
                    summary.sections[idx].services.push(text.to_string());
                }
                summary.services.push(text.to_string());
            }
        }

        summary
    }

    /// Services of the first section with the given name, ignoring case.
    pub fn section(&self, name: &str) -> Option<&SectionSummary> {
        let name = name.to_lowercase();
        self.sections.iter().find(|s| s.name.to_lowercase() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Structurer;

    fn summarize(text: &str) -> StructuredSummary {
        let v = CompiledVocabulary::builtin().unwrap();
        let outline = Structurer::new(&v).structure(text);
        StructuredSummary::from_outline(&outline, &v)
    }

    #[test]
    fn test_groups_services_by_section() {
        let summary = summarize(
            "Novos serviços nos planos\nLogomarca\nAuto\nPara-brisa\nPlano 1\nMoto\nRetrovisores",
        );

        assert_eq!(summary.titles, vec!["Novos serviços nos planos"]);
        assert_eq!(summary.services, vec!["Para-brisa", "Retrovisores"]);
        assert_eq!(summary.sections.len(), 2);
        assert_eq!(summary.section("auto").unwrap().services, vec!["Para-brisa"]);
        assert_eq!(summary.section("MOTO").unwrap().services, vec!["Retrovisores"]);
    }

    #[test]
    fn test_summary_keywords_differ_from_service_patterns() {
        let summary = summarize("Auto\nPelícula solar\nLogomarca\nFarol de milha\nFaróis");
        assert_eq!(
            summary.section("Auto").unwrap().services,
            vec!["Película solar", "Farol de milha"]
        );
    }

    #[test]
    fn test_title_does_not_close_section() {
        let summary = summarize("Auto\nPlanos de vidros e faróis\nRetrovisor externo");
        assert_eq!(summary.titles, vec!["Planos de vidros e faróis"]);
        assert_eq!(
            summary.section("auto").unwrap().services,
            vec!["Planos de vidros e faróis", "Retrovisor externo"]
        );
    }
}
