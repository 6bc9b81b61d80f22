//! Input format detection by magic bytes.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// The kind of container an input byte stream holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    /// ZIP container (Office documents and archives).
    Zip,
    Unknown,
}

impl FileKind {
    /// Whether this kind is a single raster image that goes straight to OCR.
    pub fn is_image(self) -> bool {
        matches!(
            self,
            FileKind::Jpeg | FileKind::Png | FileKind::Gif | FileKind::Bmp | FileKind::Tiff
        )
    }

    /// Short lowercase name, used in result objects.
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Jpeg => "jpeg",
            FileKind::Png => "png",
            FileKind::Gif => "gif",
            FileKind::Bmp => "bmp",
            FileKind::Tiff => "tiff",
            FileKind::Zip => "zip",
            FileKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const MAGIC: &[(&[u8], FileKind)] = &[
    (b"%PDF", FileKind::Pdf),
    (b"\xff\xd8\xff", FileKind::Jpeg),
    (b"\x89PNG", FileKind::Png),
    (b"GIF8", FileKind::Gif),
    (b"II*\x00", FileKind::Tiff),
    (b"MM\x00*", FileKind::Tiff),
    (b"PK", FileKind::Zip),
    (b"BM", FileKind::Bmp),
];

/// Detect the file kind from the leading bytes of a stream.
///
/// Empty input is an error rather than [`FileKind::Unknown`].
pub fn detect_kind(data: &[u8]) -> Result<FileKind> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    Ok(MAGIC
        .iter()
        .find(|(magic, _)| data.starts_with(magic))
        .map(|(_, kind)| *kind)
        .unwrap_or(FileKind::Unknown))
}

/// Detect the file kind of a file on disk, reading only its header.
pub fn detect_kind_from_path<P: AsRef<Path>>(path: P) -> Result<FileKind> {
    let mut header = Vec::with_capacity(8);
    File::open(path)?.take(8).read_to_end(&mut header)?;
    detect_kind(&header)
}
