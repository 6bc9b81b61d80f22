//! Native text-layer extraction.

pub mod backend;
mod layout;
mod options;
mod spatial;

pub use backend::{ContentOp, LopdfBackend, PageTextSource, PdfBackend, PdfValue};
pub use layout::{fragments_from_ops, NativeTextSource};
pub use options::{Config, PageSelection, PipelineOptions};
pub use spatial::{extract_page_text, reading_order_text};

/// Open a PDF from bytes as a native text source.
pub fn open_pdf(data: &[u8]) -> crate::Result<NativeTextSource<LopdfBackend>> {
    Ok(NativeTextSource::new(LopdfBackend::load_bytes(data)?))
}
