//! Turns an uploaded file into text for the chapterizer.
//!
//! PDFs go through `pdf-extract` page by page; pages are rejoined with form
//! feeds, which the chapterizer treats as page breaks. Anything else must be
//! UTF-8 text.

use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file is not valid UTF-8 text")]
    Encoding,

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("PDF contains no extractable text (scanned or image-only?)")]
    NoText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    /// Zero for plain-text uploads.
    pub total_pages: usize,
}

pub fn is_pdf(file_name: &str, bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC) || file_name.to_ascii_lowercase().ends_with(".pdf")
}

pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    if is_pdf(file_name, bytes) {
        extract_pdf(bytes)
    } else {
        Ok(ExtractedText {
            text: decode_text(bytes)?,
            total_pages: 0,
        })
    }
}

/// Decodes UTF-8, skipping a byte order mark if present.
pub fn decode_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::Encoding)
}

fn extract_pdf(bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    let total_pages = pages.len();

    let text = pages.join("\x0C");
    if text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }

    tracing::debug!(total_pages, chars = text.len(), "extracted PDF text");
    Ok(ExtractedText { text, total_pages })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_pdf_by_magic_or_extension() {
        assert!(is_pdf("book.bin", b"%PDF-1.7\n"));
        assert!(is_pdf("BOOK.PDF", b"whatever"));
        assert!(!is_pdf("book.txt", b"Chapter 1"));
    }

    #[test]
    fn test_plain_text_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("Chapter 1".as_bytes());
        let extracted = extract_text("book.txt", &bytes).unwrap();
        assert_eq!(extracted.text, "Chapter 1");
        assert_eq!(extracted.total_pages, 0);
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        assert!(matches!(
            extract_text("book.txt", &[0xff, 0xfe, 0x00]),
            Err(ExtractError::Encoding)
        ));
    }

    #[test]
    fn test_rejects_broken_pdf() {
        assert!(matches!(
            extract_text("broken.pdf", b"%PDF-1.4 not really a pdf"),
            Err(ExtractError::Pdf(_))
        ));
    }
}
