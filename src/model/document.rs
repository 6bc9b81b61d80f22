//! Document-level types.

use super::Page;
use crate::detect::FileKind;

/// A document flowing through the reconstruction pipeline.
///
/// Owns the source bytes (needed for rasterization) and the ordered pages.
/// Pages are appended in increasing page number and never re-ordered.
#[derive(Debug, Clone)]
pub struct Document {
    kind: FileKind,
    source: Vec<u8>,
    pages: Vec<Page>,
}

impl Document {
    /// Create an empty document over the given source bytes.
    pub fn new(kind: FileKind, source: Vec<u8>) -> Self {
        Self {
            kind,
            source,
            pages: Vec::new(),
        }
    }

    /// Build a single-page document from a standalone image.
    pub fn from_image(kind: FileKind, image: Vec<u8>) -> Self {
        let page = Page::from_raster(1, image);
        Self {
            kind,
            source: Vec::new(),
            pages: vec![page],
        }
    }

    /// Detected input kind.
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Raw source bytes.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Append a page. Its number must not precede the last page's.
    pub fn add_page(&mut self, page: Page) {
        debug_assert!(self
            .pages
            .last()
            .map_or(true, |last| last.number() <= page.number()));
        self.pages.push(page);
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number() == page_num)
    }

    /// Pages in document order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Mutable access to pages and the source they were cut from.
    pub fn pages_and_source_mut(&mut self) -> (&mut [Page], &[u8]) {
        (&mut self.pages, &self.source)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Concatenate resolved page texts, separated by a blank line.
    ///
    /// Pages that resolved to blank text contribute nothing.
    pub fn raw_text(&self) -> String {
        self.pages
            .iter()
            .filter_map(|page| page.text())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageQuality;

    #[test]
    fn test_raw_text_joins_with_blank_line() {
        let mut doc = Document::new(FileKind::Pdf, b"%PDF".to_vec());
        for (n, text) in [(1, "first page"), (2, "   "), (3, "third page\n")] {
            let mut page = Page::new(n);
            page.resolve(text.into(), PageQuality::NativeSufficient, false)
                .unwrap();
            doc.add_page(page);
        }
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.raw_text(), "first page\n\nthird page");
    }

    #[test]
    fn test_from_image() {
        let doc = Document::from_image(FileKind::Png, vec![0x89, b'P']);
        assert_eq!(doc.page_count(), 1);
        assert!(doc.get_page(1).unwrap().has_raster());
        assert!(doc.source().is_empty());
    }
}
