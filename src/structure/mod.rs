//! Heuristic structure recovery.
//!
//! Turns a cleaned, normalized line stream into an [`Outline`](crate::model::Outline)
//! using the ordered tables of a [`Vocabulary`], then derives the coverage
//! table and a section summary from it.

mod structurer;
mod summary;
mod table;
mod vocabulary;

pub use structurer::Structurer;
pub use summary::{SectionSummary, StructuredSummary};
pub use table::TableSynthesizer;
pub use vocabulary::{CompiledVocabulary, Correction, Vocabulary};
