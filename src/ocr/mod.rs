//! Rasterization and optical recognition capabilities.
//!
//! The pipeline consumes these through the [`Rasterizer`] and
//! [`Recognizer`] traits. The bundled implementations shell out to
//! `pdftoppm` (poppler-utils) and `tesseract`.

mod backend;
mod pdftoppm;
mod tesseract;
mod tools;

pub use backend::{Rasterizer, Recognizer};
pub use pdftoppm::PdftoppmRasterizer;
pub use tesseract::TesseractRecognizer;
pub use tools::{check_binary, check_tools, ToolStatus};
