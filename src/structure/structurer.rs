//! Line classification state machine.

use super::CompiledVocabulary;
use crate::model::{Outline, OutlineNode};

/// Classifies lines into outline nodes.
///
/// The only state is the currently open section. Precedence per line:
/// title, section, service, plan marker, plain line.
pub struct Structurer<'v> {
    vocabulary: &'v CompiledVocabulary,
}

impl<'v> Structurer<'v> {
    pub fn new(vocabulary: &'v CompiledVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Classify one line given the open section.
    pub fn classify(&self, line: &str, current_section: Option<usize>) -> OutlineNode {
        let v = self.vocabulary;
        let text = line.to_string();

        if v.is_title(line) {
            OutlineNode::Title { text }
        } else if v.is_section(line) {
            OutlineNode::Section { name: text }
        } else if v.is_service(line) {
            OutlineNode::ServiceItem {
                text,
                section: current_section,
            }
        } else if v.is_plan_marker(line) {
            OutlineNode::PlanMarker {
                text,
                section: current_section,
            }
        } else {
            OutlineNode::PlainLine {
                text,
                section: current_section,
            }
        }
    }

    /// Build the outline for a block of text. Blank lines are skipped.
    pub fn structure(&self, text: &str) -> Outline {
        let mut outline = Outline::new();
        let mut current_section = None;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let node = self.classify(line, current_section);
            let is_section = node.is_section();
            let idx = outline.push(node);
            if is_section {
                current_section = Some(idx);
            }
        }

        log::debug!(
            "Structured {} lines into {} sections",
            outline.len(),
            outline.sections().count()
        );
        outline
    }
}
