//! Reading-order reconstruction from positioned fragments.

use super::backend::PageTextSource;
use crate::model::{Page, PositionedFragment};

/// Join fragments top-to-bottom, one per line.
///
/// The sort is stable, so fragments at the same offset keep the order the
/// source produced them in. Offsets compare with `total_cmp`, which keeps
/// the order total even for NaN.
pub fn reading_order_text(fragments: &[PositionedFragment]) -> String {
    let mut ordered: Vec<&PositionedFragment> = fragments.iter().collect();
    ordered.sort_by(|a, b| a.offset().total_cmp(&b.offset()));
    ordered
        .iter()
        .map(|f| f.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Native text of one page, as seen by the quality gate.
///
/// The fragments are stored on the page. `None` means the page has no
/// text layer. A failing source is logged and reported as empty text,
/// which the gate routes to OCR.
pub fn extract_page_text(source: &dyn PageTextSource, page: &mut Page) -> Option<String> {
    match source.extract_positions(page.number()) {
        Ok(fragments) => {
            page.set_fragments(fragments);
            page.fragments().map(reading_order_text)
        }
        Err(e) => {
            log::warn!("Native extraction failed on page {}: {}", page.number(), e);
            Some(String::new())
        }
    }
}
