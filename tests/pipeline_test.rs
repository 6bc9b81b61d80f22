//! End-to-end tests for the reconstruction pipeline using in-memory
//! text sources, rasterizers and recognizers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use unscan::error::{Error, Result};
use unscan::{
    PageQuality, PageSelection, PageTextSource, Pipeline, PipelineOptions, PositionedFragment,
    Rasterizer, Recognizer, Status,
};

const SCANNED_TEXT: &str = "Auto\nPara-brisa\nPlano 1\n✓";

/// Native source with fixed per-page content. `Err` entries fail extraction.
struct FixedSource {
    pages: Vec<std::result::Result<Option<Vec<PositionedFragment>>, String>>,
}

impl FixedSource {
    fn lines(pages: &[&[&str]]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|lines| {
                    if lines.is_empty() {
                        return Ok(None);
                    }
                    Ok(Some(
                        lines
                            .iter()
                            .enumerate()
                            .map(|(i, text)| PositionedFragment::new(*text, 72.0 + i as f32 * 14.0))
                            .collect(),
                    ))
                })
                .collect(),
        }
    }
}

impl PageTextSource for FixedSource {
    fn page_numbers(&self) -> Vec<u32> {
        (1..=self.pages.len() as u32).collect()
    }

    fn extract_positions(&self, page: u32) -> Result<Option<Vec<PositionedFragment>>> {
        match &self.pages[page as usize - 1] {
            Ok(fragments) => Ok(fragments.clone()),
            Err(message) => Err(Error::PageExtraction {
                page,
                message: message.clone(),
            }),
        }
    }
}

/// Rasterizer that counts calls and returns a tiny PNG header.
#[derive(Clone, Default)]
struct CountingRasterizer {
    calls: Arc<AtomicUsize>,
}

impl Rasterizer for CountingRasterizer {
    fn rasterize(&self, _document: &[u8], page: u32, _dpi: u32) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut image = b"\x89PNG\r\n\x1a\n".to_vec();
        image.extend_from_slice(format!("page{}", page).as_bytes());
        Ok(image)
    }
}

/// Recognizer that returns the same text for every image.
#[derive(Clone)]
struct FixedRecognizer {
    text: &'static str,
    calls: Arc<AtomicUsize>,
}

impl FixedRecognizer {
    fn new(text: &'static str) -> Self {
        Self {
            text,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Recognizer for FixedRecognizer {
    fn recognize(&self, _image: &[u8], _language: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.to_string())
    }
}

struct FailingRecognizer;

impl Recognizer for FailingRecognizer {
    fn recognize(&self, _image: &[u8], _language: &str) -> Result<String> {
        Err(Error::Ocr("engine crashed".to_string()))
    }
}

fn pipeline(
    options: PipelineOptions,
    rasterizer: CountingRasterizer,
    recognizer: impl Recognizer + 'static,
) -> Pipeline {
    Pipeline::new(options)
        .unwrap()
        .with_rasterizer(rasterizer)
        .with_recognizer(recognizer)
}

fn long_line(word: &str, chars: usize) -> String {
    let mut line = String::new();
    while line.chars().count() < chars {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    line.chars().take(chars).collect()
}

#[test]
fn test_scanned_page_structured_from_ocr() {
    let garbage = "zqkw vxpt rrlm nbqq pzkk vrll xwpp ztqa";
    let source = FixedSource::lines(&[&[garbage]]);
    let recognizer = FixedRecognizer::new(SCANNED_TEXT);
    let p = pipeline(PipelineOptions::default(), CountingRasterizer::default(), recognizer);

    let result = p.process_source(&source, b"%PDF-1.4");
    assert_eq!(result.status, Status::Success);
    assert!(result.text.contains("## Auto"));
    assert!(result.text.contains("- Para-brisa"));
    assert!(result.text.contains("  - Plano 1"));
    assert!(result.text.contains("  - ✓"));
    // Short native text is kept alongside OCR output.
    assert!(result.raw_text.contains(garbage));
    assert!(result.raw_text.contains("--- OCR ---"));
    // The separator itself does not survive cleanup.
    assert!(!result.text.contains("--- OCR ---"));
    assert_eq!(result.pages[0].quality, PageQuality::NativeInsufficient);
    assert!(result.pages[0].ocr_invoked);
}

#[test]
fn test_sufficient_native_text_skips_ocr() {
    let line = long_line("cobertura", 150);
    let source = FixedSource::lines(&[&[line.as_str()]]);
    let rasterizer = CountingRasterizer::default();
    let recognizer = FixedRecognizer::new(SCANNED_TEXT);
    let p = pipeline(PipelineOptions::default(), rasterizer.clone(), recognizer.clone());

    let result = p.process_source(&source, b"%PDF-1.4");
    assert!(result.is_success());
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(result.ocr_pages(), 0);
    assert_eq!(result.pages[0].quality, PageQuality::NativeSufficient);
}

#[test]
fn test_mixed_document_ocr_only_where_needed() {
    let line = long_line("proteção", 120);
    let source = FixedSource::lines(&[&[line.as_str()], &[], &[line.as_str()]]);
    let rasterizer = CountingRasterizer::default();
    let recognizer = FixedRecognizer::new(SCANNED_TEXT);
    let p = pipeline(PipelineOptions::default(), rasterizer.clone(), recognizer);

    let result = p.process_source(&source, b"%PDF-1.4");
    assert!(result.is_success());
    assert_eq!(result.pages_processed, 3);
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 1);

    let qualities: Vec<PageQuality> = result.pages.iter().map(|p| p.quality).collect();
    assert_eq!(
        qualities,
        vec![
            PageQuality::NativeSufficient,
            PageQuality::NativeAbsent,
            PageQuality::NativeSufficient
        ]
    );
    // Page text is concatenated in page order.
    let first = result.raw_text.find(line.as_str()).unwrap();
    let scanned = result.raw_text.find("Para-brisa").unwrap();
    let last = result.raw_text.rfind(line.as_str()).unwrap();
    assert!(first < scanned && scanned < last);
}

#[test]
fn test_merge_discards_native_above_threshold() {
    // 70 chars: below the OCR trigger, above the merge threshold.
    let line = long_line("vidro", 70);
    let source = FixedSource::lines(&[&[line.as_str()]]);
    let p = pipeline(
        PipelineOptions::default(),
        CountingRasterizer::default(),
        FixedRecognizer::new(SCANNED_TEXT),
    );

    let result = p.process_source(&source, b"%PDF-1.4");
    assert!(result.is_success());
    assert!(result.pages[0].ocr_invoked);
    assert!(result.raw_text.contains(line.as_str()));
    assert!(!result.raw_text.contains("Para-brisa"));
}

#[test]
fn test_native_failure_falls_back_to_ocr() {
    let source = FixedSource {
        pages: vec![Err("broken content stream".to_string())],
    };
    let p = pipeline(
        PipelineOptions::default(),
        CountingRasterizer::default(),
        FixedRecognizer::new(SCANNED_TEXT),
    );

    let result = p.process_source(&source, b"%PDF-1.4");
    assert!(result.is_success());
    assert_eq!(result.pages[0].quality, PageQuality::NativeInsufficient);
    assert!(result.text.contains("## Auto"));
}

#[test]
fn test_ocr_failure_keeps_native_text() {
    let source = FixedSource::lines(&[&["Auto", "Para-brisa e vidros laterais"]]);
    let p = pipeline(
        PipelineOptions::default(),
        CountingRasterizer::default(),
        FailingRecognizer,
    );

    let result = p.process_source(&source, b"%PDF-1.4");
    assert!(result.is_success());
    assert_eq!(result.raw_text, "Auto\nPara-brisa e vidros laterais");
    assert_eq!(result.text, "## Auto\n- Para-brisa e vidros laterais");
}

#[test]
fn test_nothing_recoverable_is_error() {
    let source = FixedSource::lines(&[&[], &[]]);
    let p = pipeline(
        PipelineOptions::default(),
        CountingRasterizer::default(),
        FixedRecognizer::new(""),
    );

    let result = p.process_source(&source, b"%PDF-1.4");
    assert_eq!(result.status, Status::Error);
    assert_eq!(result.text, "");
    assert_eq!(result.pages_processed, 2);
    assert_eq!(result.ocr_pages(), 2);
}

#[test]
fn test_fragments_read_top_to_bottom() {
    let source = FixedSource {
        pages: vec![Ok(Some(vec![
            PositionedFragment::new("Para-brisa", 40.0),
            PositionedFragment::new("Novos serviços nos planos", 10.0),
            PositionedFragment::new("Auto", 25.0),
        ]))],
    };
    let options = PipelineOptions::default().with_ocr_trigger_chars(10);
    let p = pipeline(options, CountingRasterizer::default(), FixedRecognizer::new(""));

    let result = p.process_source(&source, b"%PDF-1.4");
    assert_eq!(
        result.text,
        "# Novos serviços nos planos\n## Auto\n- Para-brisa"
    );
}

#[test]
fn test_page_selection_limits_pages() {
    let line = long_line("retrovisores", 120);
    let source = FixedSource::lines(&[&[line.as_str()], &[line.as_str()], &[line.as_str()]]);
    let options = PipelineOptions::default().with_pages(PageSelection::Pages(vec![2]));
    let p = pipeline(options, CountingRasterizer::default(), FixedRecognizer::new(""));

    let result = p.process_source(&source, b"%PDF-1.4");
    assert!(result.is_success());
    assert_eq!(result.pages_processed, 1);
    assert_eq!(result.pages[0].number, 2);
}

#[test]
fn test_page_selection_outside_document() {
    let source = FixedSource::lines(&[&["Auto"]]);
    let options = PipelineOptions::default().with_pages(PageSelection::Range(5..=6));
    let p = pipeline(options, CountingRasterizer::default(), FixedRecognizer::new(""));

    let result = p.process_source(&source, b"%PDF-1.4");
    assert_eq!(result.status, Status::Error);
    assert!(result.error.unwrap().contains("page range"));
}

#[test]
fn test_structuring_is_deterministic() {
    let source = FixedSource::lines(&[&[
        "Novos serviços nos planos",
        "Auto",
        "Para-brisa",
        "Plano 1",
        "✓",
        "Moto",
        "Faróis",
        "Plano 2",
        "×",
    ]]);
    let options = PipelineOptions::default().with_ocr_trigger_chars(10);
    let p = pipeline(options, CountingRasterizer::default(), FixedRecognizer::new(""));

    let first = p.process_source(&source, b"%PDF-1.4");
    let second = p.process_source(&source, b"%PDF-1.4");
    assert!(first.is_success());
    assert_eq!(first.text, second.text);
    assert!(first.text.starts_with(
        "# Novos serviços nos planos\n## Auto\n- Para-brisa\n  - Plano 1\n  - ✓\n## Moto\n- Faróis\n  - Plano 2\n  - ×"
    ));
}

#[test]
fn test_table_needs_both_axes() {
    let options = PipelineOptions::default().with_ocr_trigger_chars(5);

    let services_only = FixedSource::lines(&[&["Auto", "Para-brisa", "Lanternas"]]);
    let p = pipeline(options.clone(), CountingRasterizer::default(), FixedRecognizer::new(""));
    let result = p.process_source(&services_only, b"%PDF-1.4");
    assert!(result.is_success());
    assert!(!result.text.contains("Tabela de Cobertura"));

    let both = FixedSource::lines(&[&["Auto", "Para-brisa", "Plano 1", "Plano 2"]]);
    let result = p.process_source(&both, b"%PDF-1.4");
    assert!(result.text.ends_with(
        "## Tabela de Cobertura\n\n| Serviço | plano 1 | plano 2 |\n|---|---|---|\n| para-brisa | ✓ | ✓ |"
    ));
}

#[test]
fn test_batch_matches_sequential() {
    let p = pipeline(
        PipelineOptions::default(),
        CountingRasterizer::default(),
        FixedRecognizer::new(SCANNED_TEXT),
    );
    let png = b"\x89PNG\r\n\x1a\nscan".to_vec();
    let inputs: Vec<Vec<u8>> = vec![png.clone(), Vec::new(), b"PK\x03\x04".to_vec(), png];

    let results = p.process_batch(&inputs);
    assert_eq!(results.len(), 4);
    assert!(results[0].is_success());
    assert_eq!(results[1].status, Status::Error);
    assert_eq!(results[2].status, Status::Error);
    assert_eq!(results[0].text, results[3].text);
    assert_eq!(results[0].text, p.process_bytes(&inputs[0]).text);
}

#[test]
fn test_structured_summary_attached() {
    let p = pipeline(
        PipelineOptions::default(),
        CountingRasterizer::default(),
        FixedRecognizer::new(SCANNED_TEXT),
    );
    let result = p.process_structured(b"\x89PNG\r\n\x1a\nscan");
    let summary = result.structure.unwrap();
    let auto = summary.section("auto").unwrap();
    assert_eq!(auto.services, vec!["Para-brisa".to_string()]);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_matches_blocking() {
    let recognizer = FixedRecognizer::new(SCANNED_TEXT);
    let p = Arc::new(pipeline(
        PipelineOptions::default(),
        CountingRasterizer::default(),
        recognizer.clone(),
    ));
    let image = b"\x89PNG\r\n\x1a\nscan".to_vec();

    let blocking = p.process_bytes(&image);
    let result = unscan::process_bytes_async(Arc::clone(&p), image).await;

    assert_eq!(result.status, Status::Success);
    assert_eq!(result.text, blocking.text);
    assert_eq!(result.raw_text, blocking.raw_text);
    assert_eq!(result.pages, blocking.pages);
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 2);
}
