//! Reconstruction pipeline.
//!
//! One document flows synchronously through: native extraction and
//! spatial ordering, the quality gate, OCR fallback and merge per page,
//! then cleanup, normalization, structuring and table synthesis over the
//! concatenated text. Pages are handled strictly in order.

mod gate;
mod merge;

pub use gate::QualityGate;
pub use merge::MergePolicy;

use rayon::prelude::*;
use std::path::Path;

use crate::detect::{detect_kind, FileKind};
use crate::error::{Error, Result};
use crate::model::{Document, Outline, Page};
use crate::ocr::{PdftoppmRasterizer, Rasterizer, Recognizer, TesseractRecognizer};
use crate::parser::{extract_page_text, open_pdf, Config, PageTextSource, PipelineOptions};
use crate::render::{markdown, CleanupPipeline, ExtractionResult};
use crate::structure::{CompiledVocabulary, StructuredSummary, Structurer, TableSynthesizer, Vocabulary};

/// Output of the text stages for one document.
#[derive(Debug, Clone)]
pub struct RenderedText {
    /// Markdown with the coverage table appended when one exists
    pub markdown: String,
    /// Classified lines
    pub outline: Outline,
}

/// Configured reconstruction pipeline.
///
/// Holds no per-document state, so one instance can serve many documents
/// concurrently.
pub struct Pipeline {
    options: PipelineOptions,
    vocabulary: CompiledVocabulary,
    rasterizer: Box<dyn Rasterizer>,
    recognizer: Box<dyn Recognizer>,
}

impl Pipeline {
    /// Pipeline with the built-in vocabulary and the `pdftoppm`/`tesseract` tools.
    pub fn new(options: PipelineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            vocabulary: CompiledVocabulary::builtin()?,
            rasterizer: Box::new(PdftoppmRasterizer::new()),
            recognizer: Box::new(TesseractRecognizer::new()),
        })
    }

    /// Pipeline from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.pipeline.clone())?.with_vocabulary(&config.vocabulary)
    }

    /// Replace the vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: &Vocabulary) -> Result<Self> {
        self.vocabulary = vocabulary.compile()?;
        Ok(self)
    }

    /// Replace the rasterizer.
    pub fn with_rasterizer(mut self, rasterizer: impl Rasterizer + 'static) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    /// Replace the recognizer.
    pub fn with_recognizer(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.recognizer = Box::new(recognizer);
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn vocabulary(&self) -> &CompiledVocabulary {
        &self.vocabulary
    }

    /// Process raw input bytes. Failures are reported in the result.
    pub fn process_bytes(&self, data: &[u8]) -> ExtractionResult {
        self.run(data, false)
    }

    /// Like [`process_bytes`](Self::process_bytes), with a section summary attached.
    pub fn process_structured(&self, data: &[u8]) -> ExtractionResult {
        self.run(data, true)
    }

    /// Read and process a file.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> ExtractionResult {
        match std::fs::read(path) {
            Ok(data) => self.process_bytes(&data),
            Err(e) => ExtractionResult::failure(&Error::Io(e), None),
        }
    }

    /// Process independent documents in parallel.
    pub fn process_batch<D: AsRef<[u8]> + Sync>(&self, inputs: &[D]) -> Vec<ExtractionResult> {
        inputs
            .par_iter()
            .map(|data| self.process_bytes(data.as_ref()))
            .collect()
    }

    /// Process a PDF through a caller-supplied native text source.
    pub fn process_source(&self, source: &dyn PageTextSource, data: &[u8]) -> ExtractionResult {
        let mut doc = match self.build_pdf_document(source, data) {
            Ok(doc) => doc,
            Err(e) => return ExtractionResult::failure(&e, None),
        };
        self.finish(&mut doc, Some(source), false)
    }

    fn run(&self, data: &[u8], with_structure: bool) -> ExtractionResult {
        let kind = match detect_kind(data) {
            Ok(kind) => kind,
            Err(e) => return ExtractionResult::failure(&e, None),
        };
        log::info!("Processing {} input ({} bytes)", kind, data.len());

        if kind.is_image() {
            let mut doc = Document::from_image(kind, data.to_vec());
            return self.finish(&mut doc, None, with_structure);
        }

        if kind != FileKind::Pdf {
            let err = Error::UnsupportedFormat(format!("{} (expected PDF or image)", kind));
            return ExtractionResult::failure(&err, None);
        }

        let source = match open_pdf(data) {
            Ok(source) => source,
            Err(e) => {
                log::warn!("Unreadable PDF: {}", e);
                return ExtractionResult::failure(&e, None);
            }
        };
        let mut doc = match self.build_pdf_document(&source, data) {
            Ok(doc) => doc,
            Err(e) => return ExtractionResult::failure(&e, None),
        };
        self.finish(&mut doc, Some(&source), with_structure)
    }

    fn build_pdf_document(&self, source: &dyn PageTextSource, data: &[u8]) -> Result<Document> {
        let all = source.page_numbers();
        let selected: Vec<u32> = all
            .iter()
            .copied()
            .filter(|p| self.options.pages.includes(*p))
            .collect();

        if !all.is_empty() && selected.is_empty() {
            return Err(Error::InvalidPageRange(format!(
                "{:?} selects none of {} pages",
                self.options.pages,
                all.len()
            )));
        }

        let mut doc = Document::new(FileKind::Pdf, data.to_vec());
        for number in selected {
            doc.add_page(Page::new(number));
        }
        Ok(doc)
    }

    /// Resolve every page, then run the text stages.
    fn finish(
        &self,
        doc: &mut Document,
        source: Option<&dyn PageTextSource>,
        with_structure: bool,
    ) -> ExtractionResult {
        if let Err(e) = self.resolve_pages(doc, source) {
            return ExtractionResult::failure(&e, Some(&*doc));
        }

        let raw_text = doc.raw_text();
        match self.render_text(&raw_text) {
            Ok(rendered) => {
                log::info!(
                    "Processed {} pages: {} raw chars, {} outline nodes",
                    doc.page_count(),
                    raw_text.chars().count(),
                    rendered.outline.len()
                );
                let result = ExtractionResult::success(doc, rendered.markdown, raw_text);
                if with_structure {
                    let summary =
                        StructuredSummary::from_outline(&rendered.outline, &self.vocabulary);
                    result.with_structure(summary)
                } else {
                    result
                }
            }
            Err(e) => {
                log::warn!("No usable text after processing: {}", e);
                ExtractionResult::failure(&e, Some(&*doc))
            }
        }
    }

    /// Resolve pages strictly in order; page-level failures never propagate.
    fn resolve_pages(&self, doc: &mut Document, source: Option<&dyn PageTextSource>) -> Result<()> {
        let gate = QualityGate::new(self.options.ocr_trigger_chars);
        let merge = MergePolicy::new(
            self.options.merge_threshold_chars,
            self.options.ocr_separator.clone(),
        );

        let (pages, bytes) = doc.pages_and_source_mut();
        for page in pages.iter_mut() {
            let native = match source {
                Some(source) => extract_page_text(source, page),
                None => None,
            };

            let quality = gate.classify(native.as_deref());
            let native = native.unwrap_or_default();
            log::debug!("Page {}: {:?}", page.number(), quality);

            if !quality.needs_ocr() {
                page.resolve(native, quality, false)?;
                continue;
            }

            let ocr = self.recognize_page(page, bytes);
            let text = merge.merge(&native, &ocr);
            page.release_raster();
            page.resolve(text, quality, true)?;
        }
        Ok(())
    }

    /// Rasterize (at most once) and recognize one page. Failures yield "".
    fn recognize_page(&self, page: &mut Page, document: &[u8]) -> String {
        let number = page.number();
        let dpi = self.options.raster_dpi;

        let raster = match page.raster_with(|| self.rasterizer.rasterize(document, number, dpi)) {
            Ok(Some(raster)) => raster,
            Ok(None) => return String::new(),
            Err(e) => {
                log::warn!("Rasterization failed on page {}: {}", number, e);
                return String::new();
            }
        };

        match self.recognizer.recognize(raster, &self.options.ocr_language) {
            Ok(text) => {
                log::debug!("OCR page {}: {} chars", number, text.trim().chars().count());
                text
            }
            Err(e) => {
                log::warn!("OCR failed on page {}: {}", number, e);
                String::new()
            }
        }
    }

    /// Cleanup, normalize, structure and synthesize the coverage table.
    ///
    /// Fails with [`Error::EmptyResult`] when nothing survives cleanup.
    pub fn render_text(&self, raw_text: &str) -> Result<RenderedText> {
        let cleanup = CleanupPipeline::new(self.options.cleanup.clone(), &self.vocabulary);
        let cleaned = cleanup.process(raw_text);
        let normalized = self.vocabulary.normalizer().apply(&cleaned);

        if normalized.trim().is_empty() {
            return Err(Error::EmptyResult);
        }

        let outline = Structurer::new(&self.vocabulary).structure(&normalized);
        let outline_md = markdown::render_outline(&outline);
        let table_md = TableSynthesizer::new(&self.vocabulary).synthesize_markdown(&outline);

        Ok(RenderedText {
            markdown: markdown::compose(&outline_md, &table_md),
            outline,
        })
    }
}

/// Offload a document to tokio's blocking pool.
#[cfg(feature = "async")]
pub async fn process_bytes_async(
    pipeline: std::sync::Arc<Pipeline>,
    data: Vec<u8>,
) -> ExtractionResult {
    let handle = tokio::task::spawn_blocking(move || pipeline.process_bytes(&data));
    match handle.await {
        Ok(result) => result,
        Err(e) => ExtractionResult::failure(&Error::Io(std::io::Error::other(e.to_string())), None),
    }
}
