//! Raw text extraction from uploaded documents

use crate::error::{Error, Result};

/// Converts an uploaded document into raw text
///
/// Implementations are synchronous and may be CPU heavy; callers run them on
/// the blocking pool.
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of `data`
    fn extract(&self, data: &[u8]) -> Result<String>;

    /// Get extractor name for logging
    fn name(&self) -> &str;
}

/// PDF text extraction backed by `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, data: &[u8]) -> Result<String> {
        let raw = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::Extraction(format!("failed to read PDF: {}", e)))?;
        Ok(cleanup_text(&raw))
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

/// Normalize extracted text: drop NUL bytes, trim lines, remove blank lines,
/// and flatten typographic ligatures and spaces.
pub fn cleanup_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ") // Non-breaking space -> space
        .replace('\u{FB00}', "ff") // ff ligature
        .replace('\u{FB01}', "fi") // fi ligature
        .replace('\u{FB02}', "fl") // fl ligature
        .replace('\u{FB03}', "ffi") // ffi ligature
        .replace('\u{FB04}', "ffl") // ffl ligature
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
