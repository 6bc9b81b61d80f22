//! Text stages and output rendering.
//!
//! Cleanup and normalization turn reconstructed page text into a stable
//! line stream; the markdown and JSON renderers produce caller output.

mod cleanup;
mod json;
pub mod markdown;
mod normalize;
mod result;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use json::{to_json, JsonFormat};
pub use markdown::{render_coverage_table, render_outline};
pub use normalize::Normalizer;
pub use result::{ExtractionResult, PageReport, Status};
