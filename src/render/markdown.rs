//! Markdown rendering of outlines and coverage tables.

use crate::model::{CoverageTable, Outline, OutlineNode};

/// Render an outline, one node per line.
///
/// Titles become `#` headings and sections `##` headings. Services are
/// `-` items; plan markers and lines under a section are indented items;
/// top-level plain lines stay plain text.
pub fn render_outline(outline: &Outline) -> String {
    outline
        .nodes()
        .iter()
        .map(render_node)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_node(node: &OutlineNode) -> String {
    match node {
        OutlineNode::Title { text } => format!("# {}", text),
        OutlineNode::Section { name } => format!("## {}", name),
        OutlineNode::ServiceItem { text, .. } => format!("- {}", text),
        OutlineNode::PlanMarker { text, .. } => format!("  - {}", text),
        OutlineNode::PlainLine {
            text,
            section: Some(_),
        } => format!("  - {}", text),
        OutlineNode::PlainLine {
            text,
            section: None,
        } => text.clone(),
    }
}

/// Render a coverage table under its own `##` heading.
pub fn render_coverage_table(table: &CoverageTable, heading: &str, service_label: &str) -> String {
    let mut out = String::new();

    out.push_str("## ");
    out.push_str(heading);
    out.push_str("\n\n");

    out.push_str("| ");
    out.push_str(&escape_cell(service_label));
    for plan in &table.plans {
        out.push_str(" | ");
        out.push_str(&escape_cell(plan));
    }
    out.push_str(" |\n");

    out.push('|');
    for _ in 0..=table.column_count() {
        out.push_str("---|");
    }

    for (row, service) in table.services.iter().enumerate() {
        out.push_str("\n| ");
        out.push_str(&escape_cell(service));
        for col in 0..table.column_count() {
            out.push_str(" | ");
            out.push_str(table.cell(row, col).unwrap_or_default());
        }
        out.push_str(" |");
    }

    out
}

/// Join the outline markdown and the optional table section.
pub fn compose(outline_md: &str, table_md: &str) -> String {
    match (outline_md.is_empty(), table_md.is_empty()) {
        (_, true) => outline_md.to_string(),
        (true, false) => table_md.to_string(),
        (false, false) => format!("{}\n\n{}", outline_md, table_md),
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_outline() {
        let mut outline = Outline::new();
        outline.push(OutlineNode::Title {
            text: "Novos serviços nos planos".into(),
        });
        outline.push(OutlineNode::PlainLine {
            text: "texto solto".into(),
            section: None,
        });
        let auto = outline.push(OutlineNode::Section {
            name: "Auto".into(),
        });
        outline.push(OutlineNode::ServiceItem {
            text: "Para-brisa".into(),
            section: Some(auto),
        });
        outline.push(OutlineNode::PlainLine {
            text: "Plano 1".into(),
            section: Some(auto),
        });
        outline.push(OutlineNode::PlanMarker {
            text: "✓".into(),
            section: Some(auto),
        });

        assert_eq!(
            render_outline(&outline),
            "# Novos serviços nos planos\ntexto solto\n## Auto\n- Para-brisa\n  - Plano 1\n  - ✓"
        );
    }

    #[test]
    fn test_render_table_escapes_pipes() {
        let table = CoverageTable::new(vec!["vidro | teto".into()], vec!["1".into()], "✓").unwrap();
        let md = render_coverage_table(&table, "Tabela", "Serviço");
        assert!(md.contains("| vidro \\| teto | ✓ |"));
        assert!(md.contains("|---|---|"));
    }

    #[test]
    fn test_compose() {
        assert_eq!(compose("a", ""), "a");
        assert_eq!(compose("", "t"), "t");
        assert_eq!(compose("a", "t"), "a\n\nt");
    }
}
