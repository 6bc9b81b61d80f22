//! Classification vocabulary.
//!
//! Every keyword list and pattern the cleanup, normalization, structuring
//! and table stages match against lives here as ordered data. A
//! [`Vocabulary`] can be loaded from JSON; [`Vocabulary::compile`]
//! validates it and produces the matchers the stages use.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::render::Normalizer;

/// A literal find/replace correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub from: String,
    pub to: String,
}

impl Correction {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordered, versionable classification tables.
///
/// Pattern lists are tried in order; within the structurer the lists
/// themselves are tried title, section, service, plan marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Case-insensitive regexes searched anywhere in a line.
    pub title_patterns: Vec<String>,

    /// Case-insensitive regexes for section headers (anchor them).
    pub section_patterns: Vec<String>,

    /// Case-insensitive regexes searched anywhere in a line.
    pub service_patterns: Vec<String>,

    /// Check/cross glyphs. Alphanumeric glyphs match only as whole tokens.
    pub plan_markers: Vec<String>,

    /// Lowercase substrings marking page furniture.
    pub footer_keywords: Vec<String>,

    /// Literal corrections applied after cleanup.
    pub corrections: Vec<Correction>,

    /// Lowercase substrings that make a line a coverage table row.
    pub table_service_keywords: Vec<String>,

    /// Regexes (matched on the lowercased line) for coverage table columns.
    pub plan_column_patterns: Vec<String>,

    /// Lowercase substrings that list a line as a service in the summary.
    pub summary_service_keywords: Vec<String>,

    /// Heading of the coverage table section.
    pub table_heading: String,

    /// Header of the service column.
    pub table_service_label: String,

    /// Cell value for covered pairs.
    pub table_marker: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            title_patterns: strings(&[
                r"novos? serviços? nos? planos?",
                r"planos? de (vidros?|proteção)",
                r"cobertura.*planos?",
            ]),
            section_patterns: strings(&[
                r"^(auto|carros?)$",
                r"^(moto|motocicletas?)$",
                r"^(pequenos? reparos?)$",
                r"^(proteção pneu e roda)$",
                r"^(teto solar|panorâmico)$",
            ]),
            service_patterns: strings(&[
                r"para-brisa",
                r"vidro traseiro",
                r"vidros? laterais?",
                r"película",
                r"lanternas?",
                r"faróis?",
                r"retrovisores?",
                r"logomarca",
            ]),
            plan_markers: strings(&["✓", "✔", "×", "✗", "X", "x", "v"]),
            footer_keywords: strings(&[
                "página", "page", "www.", "http", "email", "tel:", "telefone",
            ]),
            corrections: vec![
                Correction::new("VIdros", "Vidros"),
                Correction::new("vIdros", "vidros"),
                Correction::new("VIDROS", "Vidros"),
                Correction::new("para-brisa", "Para-brisa"),
                Correction::new("PARA-BRISA", "Para-brisa"),
                Correction::new("lanternas", "Lanternas"),
                Correction::new("LANTERNAS", "Lanternas"),
                Correction::new("faróis", "Faróis"),
                Correction::new("FARÓIS", "Faróis"),
                Correction::new("retrovisores", "Retrovisores"),
                Correction::new("RETROVISORES", "Retrovisores"),
                Correction::new("pequenos reparos", "Pequenos Reparos"),
                Correction::new("PEQUENOS REPAROS", "Pequenos Reparos"),
            ],
            table_service_keywords: strings(&[
                "para-brisa",
                "vidro",
                "lanterna",
                "farol",
                "retrovisor",
            ]),
            plan_column_patterns: strings(&[r"^planos? \d+", r"^\d+$"]),
            summary_service_keywords: strings(&[
                "para-brisa",
                "vidro",
                "lanterna",
                "farol",
                "retrovisor",
                "película",
            ]),
            table_heading: "Tabela de Cobertura".to_string(),
            table_service_label: "Serviço".to_string(),
            table_marker: "✓".to_string(),
        }
    }
}

impl Vocabulary {
    /// Parse a vocabulary from JSON. Missing fields take the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a vocabulary from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate and compile into matchers.
    pub fn compile(&self) -> Result<CompiledVocabulary> {
        let markers = PlanMarkers::new(&self.plan_markers);

        Ok(CompiledVocabulary {
            titles: compile_patterns(&self.title_patterns, true)?,
            sections: compile_patterns(&self.section_patterns, true)?,
            services: compile_patterns(&self.service_patterns, true)?,
            plan_columns: compile_patterns(&self.plan_column_patterns, false)?,
            markers,
            footer_keywords: lowercase_all(&self.footer_keywords),
            table_keywords: lowercase_all(&self.table_service_keywords),
            summary_keywords: lowercase_all(&self.summary_service_keywords),
            normalizer: Normalizer::new(&self.corrections)?,
            table_heading: self.table_heading.clone(),
            table_service_label: self.table_service_label.clone(),
            table_marker: self.table_marker.clone(),
        })
    }
}

fn compile_patterns(patterns: &[String], case_insensitive: bool) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            let p: String = p.nfc().collect();
            RegexBuilder::new(&p)
                .case_insensitive(case_insensitive)
                .build()
                .map_err(|e| Error::Config(format!("invalid pattern {:?}: {}", p, e)))
        })
        .collect()
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect::<String>().to_lowercase())
        .collect()
}

/// Plan marker glyph matcher.
#[derive(Debug, Clone)]
struct PlanMarkers {
    /// Symbol glyphs, matched as substrings.
    symbols: Vec<String>,
    /// Alphanumeric glyphs, matched as whole whitespace-separated tokens.
    tokens: Vec<String>,
}

impl PlanMarkers {
    fn new(markers: &[String]) -> Self {
        let (tokens, symbols): (Vec<String>, Vec<String>) = markers
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| m.nfc().collect::<String>())
            .partition(|m| m.chars().any(char::is_alphanumeric));
        Self { symbols, tokens }
    }

    fn matches(&self, line: &str) -> bool {
        self.symbols.iter().any(|s| line.contains(s.as_str()))
            || line
                .split_whitespace()
                .any(|tok| self.tokens.iter().any(|t| t == tok))
    }

    fn only_symbols(&self, line: &str) -> bool {
        let mut tokens = line.split_whitespace().peekable();
        tokens.peek().is_some()
            && tokens.all(|tok| {
                let mut rest = tok;
                while !rest.is_empty() {
                    match self.symbols.iter().find(|s| rest.starts_with(s.as_str())) {
                        Some(s) => rest = &rest[s.len()..],
                        None => return false,
                    }
                }
                true
            })
    }
}

/// Validated vocabulary ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledVocabulary {
    titles: Vec<Regex>,
    sections: Vec<Regex>,
    services: Vec<Regex>,
    plan_columns: Vec<Regex>,
    markers: PlanMarkers,
    footer_keywords: Vec<String>,
    table_keywords: Vec<String>,
    summary_keywords: Vec<String>,
    normalizer: Normalizer,
    table_heading: String,
    table_service_label: String,
    table_marker: String,
}

impl CompiledVocabulary {
    /// Compile the built-in vocabulary.
    pub fn builtin() -> Result<Self> {
        Vocabulary::default().compile()
    }

    pub fn is_title(&self, line: &str) -> bool {
        self.titles.iter().any(|re| re.is_match(line))
    }

    pub fn is_section(&self, line: &str) -> bool {
        self.sections.iter().any(|re| re.is_match(line))
    }

    pub fn is_service(&self, line: &str) -> bool {
        self.services.iter().any(|re| re.is_match(line))
    }

    pub fn is_plan_marker(&self, line: &str) -> bool {
        self.markers.matches(line)
    }

    /// Whether the line holds nothing but symbol plan markers.
    pub fn is_marker_only(&self, line: &str) -> bool {
        self.markers.only_symbols(line)
    }

    /// Whether the line contains a footer keyword, ignoring case.
    pub fn is_footer(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.footer_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Whether a lowercased line is a coverage table row.
    pub fn is_table_service(&self, lower: &str) -> bool {
        self.table_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Whether the line is listed as a service in the structured summary.
    pub fn is_summary_service(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.summary_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Whether a lowercased line is a coverage table column.
    pub fn is_plan_column(&self, lower: &str) -> bool {
        self.plan_columns.iter().any(|re| re.is_match(lower))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn table_heading(&self) -> &str {
        &self.table_heading
    }

    pub fn table_service_label(&self) -> &str {
        &self.table_service_label
    }

    pub fn table_marker(&self) -> &str {
        &self.table_marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> CompiledVocabulary {
        CompiledVocabulary::builtin().unwrap()
    }

    #[test]
    fn test_builtin_compiles() {
        let v = vocab();
        assert!(v.is_title("Novos serviços nos planos"));
        assert!(v.is_title("COBERTURA DOS PLANOS"));
        assert!(v.is_section("Auto"));
        assert!(v.is_section("Pequenos Reparos"));
        assert!(!v.is_section("Auto e moto"));
        assert!(v.is_service("Para-brisa"));
        assert!(v.is_service("Troca de FARÓIS"));
    }

    #[test]
    fn test_plan_marker_tokens() {
        let v = vocab();
        assert!(v.is_plan_marker("✓"));
        assert!(v.is_plan_marker("Plano 1 ✓"));
        assert!(v.is_plan_marker("x"));
        assert!(v.is_plan_marker("Plano 2 X"));
        assert!(!v.is_plan_marker("Vidros"));
        assert!(!v.is_plan_marker("Plano 1"));
    }

    #[test]
    fn test_marker_only() {
        let v = vocab();
        assert!(v.is_marker_only("✓"));
        assert!(v.is_marker_only("✓ ×"));
        assert!(v.is_marker_only("✓✓"));
        assert!(!v.is_marker_only("x"));
        assert!(!v.is_marker_only("✓ ok"));
        assert!(!v.is_marker_only(""));
    }

    #[test]
    fn test_footer_case_insensitive() {
        let v = vocab();
        assert!(v.is_footer("Visite WWW.exemplo.com"));
        assert!(v.is_footer("Página 3 de 10"));
        assert!(!v.is_footer("Pagamento mensal"));
    }

    #[test]
    fn test_summary_keywords() {
        let v = vocab();
        assert!(v.is_summary_service("Aplicação de PELÍCULA"));
        assert!(v.is_summary_service("Vidros laterais"));
        assert!(!v.is_summary_service("Logomarca"));
        assert!(!v.is_summary_service("Faróis"));
    }

    #[test]
    fn test_plan_columns() {
        let v = vocab();
        assert!(v.is_plan_column("plano 1"));
        assert!(v.is_plan_column("planos 12 e 13"));
        assert!(v.is_plan_column("3"));
        assert!(!v.is_plan_column("3 meses"));
        assert!(!v.is_plan_column("o plano 1"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let vocab = Vocabulary {
            section_patterns: vec!["^(auto".into()],
            ..Vocabulary::default()
        };
        assert!(matches!(vocab.compile(), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let vocab = Vocabulary::from_json(r#"{"table_marker": "sim"}"#).unwrap();
        assert_eq!(vocab.table_marker, "sim");
        assert_eq!(vocab.table_heading, "Tabela de Cobertura");
        assert_eq!(vocab.section_patterns.len(), 5);
    }
}
