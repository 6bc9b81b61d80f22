//! Classified document outline.

use serde::{Deserialize, Serialize};

/// One classified line.
///
/// Nested nodes refer to their owning section by its index in the
/// [`Outline`], never by pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutlineNode {
    /// Top-level document title.
    Title { text: String },
    /// Section header; opens a new section.
    Section { name: String },
    /// A service line, nested under a section if one is open.
    ServiceItem {
        text: String,
        section: Option<usize>,
    },
    /// A plan marker line; always rendered one level deep.
    PlanMarker {
        text: String,
        section: Option<usize>,
    },
    /// Any other line.
    PlainLine {
        text: String,
        section: Option<usize>,
    },
}

impl OutlineNode {
    /// The line text carried by this node.
    pub fn text(&self) -> &str {
        match self {
            OutlineNode::Title { text }
            | OutlineNode::ServiceItem { text, .. }
            | OutlineNode::PlanMarker { text, .. }
            | OutlineNode::PlainLine { text, .. } => text,
            OutlineNode::Section { name } => name,
        }
    }

    /// Index of the owning section, if any.
    pub fn section(&self) -> Option<usize> {
        match self {
            OutlineNode::ServiceItem { section, .. }
            | OutlineNode::PlanMarker { section, .. }
            | OutlineNode::PlainLine { section, .. } => *section,
            OutlineNode::Title { .. } | OutlineNode::Section { .. } => None,
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, OutlineNode::Section { .. })
    }

    pub fn is_service(&self) -> bool {
        matches!(self, OutlineNode::ServiceItem { .. })
    }
}

/// Ordered list of classified lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    nodes: Vec<OutlineNode>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its index.
    pub fn push(&mut self, node: OutlineNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn nodes(&self) -> &[OutlineNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&OutlineNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices and names of all section headers, in order.
    pub fn sections(&self) -> impl Iterator<Item = (usize, &str)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_section())
            .map(|(idx, node)| (idx, node.text()))
    }

    /// Nodes owned by the section at `section`.
    ///
    /// Repeated sections with the same name are distinct; each owns only
    /// the lines that followed it.
    pub fn children_of(&self, section: usize) -> impl Iterator<Item = &OutlineNode> {
        self.nodes
            .iter()
            .filter(move |node| node.section() == Some(section))
    }

    /// Line texts of every node, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(OutlineNode::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Outline {
        let mut outline = Outline::new();
        outline.push(OutlineNode::Title {
            text: "Novos serviços".into(),
        });
        let auto = outline.push(OutlineNode::Section {
            name: "Auto".into(),
        });
        outline.push(OutlineNode::ServiceItem {
            text: "Para-brisa".into(),
            section: Some(auto),
        });
        let again = outline.push(OutlineNode::Section {
            name: "Auto".into(),
        });
        outline.push(OutlineNode::PlainLine {
            text: "Plano 1".into(),
            section: Some(again),
        });
        outline
    }

    #[test]
    fn test_children_by_index() {
        let outline = sample();
        let first: Vec<_> = outline.children_of(1).map(OutlineNode::text).collect();
        let second: Vec<_> = outline.children_of(3).map(OutlineNode::text).collect();
        assert_eq!(first, vec!["Para-brisa"]);
        assert_eq!(second, vec!["Plano 1"]);
    }

    #[test]
    fn test_sections_and_lines() {
        let outline = sample();
        let sections: Vec<_> = outline.sections().collect();
        assert_eq!(sections, vec![(1, "Auto"), (3, "Auto")]);
        assert_eq!(outline.lines().count(), 5);
    }

    #[test]
    fn test_node_serialization() {
        let node = OutlineNode::ServiceItem {
            text: "Faróis".into(),
            section: Some(2),
        };
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"service_item","text":"Faróis","section":2}"#
        );
    }
}
