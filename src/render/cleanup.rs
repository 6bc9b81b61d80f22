//! Artifact and layout cleanup for reconstructed page text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::structure::CompiledVocabulary;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPreset {
    /// Minimal cleanup: Unicode NFC and whitespace only
    Minimal,
    /// Standard cleanup: OCR artifacts and page furniture removed
    #[default]
    Standard,
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Collapse runs of spaces and tabs into one space
    pub collapse_spaces: bool,

    /// Remove blank lines entirely (otherwise runs collapse to one)
    pub remove_empty_lines: bool,

    /// Remove lines shorter than `min_line_chars`
    pub remove_short_lines: bool,

    /// Minimum characters a line needs to survive
    pub min_line_chars: usize,

    /// Remove lines made only of punctuation and symbols
    pub remove_symbol_lines: bool,

    /// Remove lines that are only digits (page numbers)
    pub remove_page_numbers: bool,

    /// Remove short all-uppercase lines (running headers)
    pub remove_headers: bool,

    /// Uppercase lines shorter than this are treated as headers
    pub header_max_chars: usize,

    /// Remove lines containing footer vocabulary
    pub remove_footers: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            remove_replacement_char: false,
            collapse_spaces: true,
            remove_empty_lines: false,
            remove_short_lines: false,
            min_line_chars: 3,
            remove_symbol_lines: false,
            remove_page_numbers: false,
            remove_headers: false,
            header_max_chars: 20,
            remove_footers: false,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            collapse_spaces: true,
            remove_empty_lines: true,
            remove_short_lines: true,
            min_line_chars: 3,
            remove_symbol_lines: true,
            remove_page_numbers: true,
            remove_headers: true,
            header_max_chars: 20,
            remove_footers: true,
        }
    }

    /// Set the minimum line length.
    pub fn with_min_line_chars(mut self, chars: usize) -> Self {
        self.min_line_chars = chars;
        self
    }

    /// Set the header length limit.
    pub fn with_header_max_chars(mut self, chars: usize) -> Self {
        self.header_max_chars = chars;
        self
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

const LIGATURES: &[(&str, &str)] = &[
    ("\u{FB00}", "ff"),  // ﬀ
    ("\u{FB01}", "fi"),  // ﬁ
    ("\u{FB02}", "fl"),  // ﬂ
    ("\u{FB03}", "ffi"), // ﬃ
    ("\u{FB04}", "ffl"), // ﬄ
    ("\u{FB05}", "st"),  // ﬅ (long s + t)
    ("\u{FB06}", "st"),  // ﬆ
];

fn spaces_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").expect("static pattern"))
}

/// Text cleanup pipeline.
///
/// Every pass is line-local or character-local, and character-level
/// passes run before NFC, so running the pipeline on its own output
/// returns it unchanged.
pub struct CleanupPipeline<'v> {
    options: CleanupOptions,
    vocabulary: &'v CompiledVocabulary,
}

impl<'v> CleanupPipeline<'v> {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions, vocabulary: &'v CompiledVocabulary) -> Self {
        Self {
            options,
            vocabulary,
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset, vocabulary: &'v CompiledVocabulary) -> Self {
        Self::new(CleanupOptions::from_preset(preset), vocabulary)
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result = text.replace("\r\n", "\n").replace('\r', "\n");

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.collapse_spaces {
            result = spaces_regex().replace_all(&result, " ").into_owned();
        }

        let mut lines: Vec<&str> = Vec::new();
        let mut blank_run = false;
        for line in result.split('\n').map(str::trim) {
            if line.is_empty() {
                if !self.options.remove_empty_lines && !blank_run && !lines.is_empty() {
                    lines.push("");
                }
                blank_run = true;
                continue;
            }
            if self.keep_line(line) {
                lines.push(line);
                blank_run = false;
            }
        }
        while lines.last() == Some(&"") {
            lines.pop();
        }

        lines.join("\n")
    }

    /// Decide whether a trimmed, non-empty line survives.
    fn keep_line(&self, line: &str) -> bool {
        if self.vocabulary.is_marker_only(line) {
            return true;
        }

        let opts = &self.options;
        let chars = line.chars().count();

        if opts.remove_short_lines && chars < opts.min_line_chars {
            return false;
        }
        if opts.remove_symbol_lines && is_symbol_only(line) {
            return false;
        }
        if opts.remove_page_numbers && line.chars().all(char::is_numeric) {
            return false;
        }
        if opts.remove_headers && chars < opts.header_max_chars && is_uppercase(line) {
            return false;
        }
        if opts.remove_footers && self.vocabulary.is_footer(line) {
            return false;
        }
        true
    }
}

/// No letters, digits, underscores or whitespace.
fn is_symbol_only(line: &str) -> bool {
    line.chars()
        .all(|c| !(c.is_alphanumeric() || c == '_' || c.is_whitespace()))
}

/// At least one cased character, and no lowercase ones.
fn is_uppercase(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}
