//! Content stream interpretation into positioned fragments.
//!
//! Text-showing operators are tracked through a [`TextMatrix`]; each shown
//! string becomes a span with its baseline position. Consecutive spans on
//! the same baseline are joined into one fragment, so a fragment is a
//! visual line of text rather than a single `Tj` operand.

use super::backend::{get_number_from_value, ContentOp, PageId, PageTextSource, PdfBackend, PdfValue};
use crate::error::{Error, Result};
use crate::model::PositionedFragment;

/// Kerning adjustment (thousandths of text space) treated as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Approximate glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// A shown string at a baseline position.
#[derive(Debug, Clone)]
struct Span {
    text: String,
    x: f32,
    y: f32,
    font_size: f32,
}

impl Span {
    fn estimated_end(&self) -> f32 {
        self.x + self.text.chars().count() as f32 * self.font_size * AVG_GLYPH_WIDTH
    }
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_e = e;
        self.line_f = f;
    }

    /// Move to the start of the next line, offset from the current line start.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 { self.leading } else { 12.0 };
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.b * self.b + self.d * self.d).sqrt()
    }
}

/// Interpret decoded content operations for one page.
pub fn fragments_from_ops<B: PdfBackend + ?Sized>(
    backend: &B,
    page: PageId,
    ops: &[ContentOp],
    page_height: f32,
) -> Vec<PositionedFragment> {
    let decode = |font: &[u8], bytes: &[u8]| backend.decode_text(page, font, bytes);
    let spans = spans_from_ops(ops, decode);
    join_spans(spans)
        .into_iter()
        .map(|span| PositionedFragment::from_baseline(span.text, span.y, page_height))
        .collect()
}

fn spans_from_ops<F>(ops: &[ContentOp], decode: F) -> Vec<Span>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut spans = Vec::new();
    let mut font_name: Vec<u8> = Vec::new();
    let mut font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in ops {
        let operand = |i: usize| op.operands.get(i).and_then(get_number_from_value);

        let shown = match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                matrix = TextMatrix {
                    leading: matrix.leading,
                    ..TextMatrix::default()
                };
                None
            }
            "ET" => {
                in_text_block = false;
                None
            }
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    font_name = name.clone();
                }
                font_size = operand(1).unwrap_or(12.0);
                None
            }
            "TL" => {
                matrix.leading = operand(0).unwrap_or(0.0);
                None
            }
            "Td" | "TD" => {
                let tx = operand(0).unwrap_or(0.0);
                let ty = operand(1).unwrap_or(0.0);
                if op.operator == "TD" {
                    matrix.leading = -ty;
                }
                matrix.translate(tx, ty);
                None
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    matrix.set(
                        operand(0).unwrap_or(1.0),
                        operand(1).unwrap_or(0.0),
                        operand(2).unwrap_or(0.0),
                        operand(3).unwrap_or(1.0),
                        operand(4).unwrap_or(0.0),
                        operand(5).unwrap_or(0.0),
                    );
                }
                None
            }
            "T*" => {
                matrix.next_line();
                None
            }
            "Tj" => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => Some(decode(&font_name, bytes)),
                _ => None,
            },
            "TJ" => match op.operands.first() {
                Some(PdfValue::Array(items)) => Some(decode_tj_array(items, |b| decode(&font_name, b))),
                _ => None,
            },
            "'" | "\"" => {
                matrix.next_line();
                let idx = if op.operator == "\"" { 2 } else { 0 };
                match op.operands.get(idx) {
                    Some(PdfValue::Str(bytes)) => Some(decode(&font_name, bytes)),
                    _ => None,
                }
            }
            _ => None,
        };

        if let Some(text) = shown {
            if in_text_block && !text.trim().is_empty() {
                let (x, y) = matrix.position();
                let size = font_size * matrix.scale();
                let span = Span {
                    text,
                    x,
                    y,
                    font_size: size,
                };
                // Advance so the next string on this line starts after this one.
                matrix.e = span.estimated_end();
                spans.push(span);
            }
        }
    }

    spans
}

/// Concatenate a `TJ` array, turning wide negative kerning into spaces.
fn decode_tj_array<F>(items: &[PdfValue], decode: F) -> String
where
    F: Fn(&[u8]) -> String,
{
    let mut combined = String::new();
    for item in items {
        match item {
            PdfValue::Str(bytes) => combined.push_str(&decode(bytes)),
            PdfValue::Integer(_) | PdfValue::Real(_) => {
                let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                if adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(' ')
                {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

/// Merge consecutive spans that share a baseline.
fn join_spans(spans: Vec<Span>) -> Vec<Span> {
    let mut lines: Vec<Span> = Vec::new();

    for span in spans {
        if let Some(last) = lines.last_mut() {
            let tolerance = (last.font_size.min(span.font_size) * 0.3).max(1.0);
            if (last.y - span.y).abs() <= tolerance && span.x >= last.x {
                let gap = span.x - last.estimated_end();
                if gap > span.font_size * 0.15
                    && !last.text.ends_with(' ')
                    && !span.text.starts_with(' ')
                {
                    last.text.push(' ');
                }
                last.text.push_str(&span.text);
                continue;
            }
        }
        lines.push(span);
    }

    for line in &mut lines {
        line.text = line.text.trim().to_string();
    }
    lines
}

/// Native text source over any [`PdfBackend`].
pub struct NativeTextSource<B> {
    backend: B,
}

impl<B: PdfBackend> NativeTextSource<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: PdfBackend> PageTextSource for NativeTextSource<B> {
    fn page_numbers(&self) -> Vec<u32> {
        self.backend.pages().keys().copied().collect()
    }

    fn extract_positions(&self, page: u32) -> Result<Option<Vec<PositionedFragment>>> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page)
            .ok_or(Error::PageOutOfRange(page, pages.len() as u32))?;

        let page_error = |e: Error| Error::PageExtraction {
            page,
            message: e.to_string(),
        };

        let content = self.backend.page_content(page_id).map_err(page_error)?;
        let ops = self.backend.decode_content(&content).map_err(page_error)?;
        let height = self.backend.page_height(page_id);

        let fragments = fragments_from_ops(&self.backend, page_id, &ops, height);
        if fragments.is_empty() {
            return Ok(None);
        }
        Ok(Some(fragments))
    }
}
