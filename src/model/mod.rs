//! Document model types for multi-source text reconstruction.
//!
//! A [`Document`] is built from raw input bytes and owns its [`Page`]s.
//! Pages carry native [`PositionedFragment`]s, a lazily produced raster,
//! and their resolved text. After the pipeline runs, the classified
//! [`Outline`] and an optional [`CoverageTable`] describe the recovered
//! structure.

mod document;
mod fragment;
mod outline;
mod page;
mod table;

pub use document::Document;
pub use fragment::PositionedFragment;
pub use outline::{Outline, OutlineNode};
pub use page::{Page, PageQuality};
pub use table::CoverageTable;
