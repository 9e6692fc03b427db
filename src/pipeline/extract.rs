//! Document Reader: turn a PDF into one plain-text string.
//!
//! Page texts are concatenated in page order with nothing inserted between
//! them, so page boundaries do not survive extraction.
//!
//! ## Why read bytes first?
//!
//! The whole file is read in a single `std::fs::read` call and the handle is
//! closed before parsing starts. A malformed PDF therefore can never leave a
//! file handle open, whichever parse step fails.
//!
//! Parsing runs under `spawn_blocking`: lopdf is synchronous and decoding
//! content streams of a long document is CPU-bound work that would stall a
//! Tokio worker.

use crate::error::Pdf2SumError;
use crate::output::DocumentMetadata;
use crate::pipeline::input;
use lopdf::{Dictionary, Document, Object};
use std::path::Path;
use tracing::{debug, info};

/// Text and metadata of a parsed PDF.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Read a PDF file and return its full text.
pub async fn read_text(pdf_path: impl AsRef<Path>) -> Result<String, Pdf2SumError> {
    Ok(extract_document(pdf_path).await?.text)
}

/// Read a PDF file and return its full text and metadata.
pub async fn extract_document(
    pdf_path: impl AsRef<Path>,
) -> Result<ExtractedDocument, Pdf2SumError> {
    let path = input::validate_local(pdf_path.as_ref())?;

    tokio::task::spawn_blocking(move || {
        let bytes = read_file(&path)?;
        parse_document(&bytes, &path)
    })
    .await
    .map_err(|e| Pdf2SumError::Internal(format!("Extract task panicked: {}", e)))?
}

/// Read an in-memory PDF and return its full text and metadata.
pub async fn read_bytes(bytes: Vec<u8>) -> Result<ExtractedDocument, Pdf2SumError> {
    tokio::task::spawn_blocking(move || parse_document(&bytes, Path::new("<memory>")))
        .await
        .map_err(|e| Pdf2SumError::Internal(format!("Extract task panicked: {}", e)))?
}

/// Extract document metadata without pulling out any text.
pub async fn extract_metadata(
    pdf_path: impl AsRef<Path>,
) -> Result<DocumentMetadata, Pdf2SumError> {
    let path = input::validate_local(pdf_path.as_ref())?;

    tokio::task::spawn_blocking(move || {
        let bytes = read_file(&path)?;
        let document = load_document(&bytes, &path)?;
        Ok(read_metadata(&document))
    })
    .await
    .map_err(|e| Pdf2SumError::Internal(format!("Metadata task panicked: {}", e)))?
}

fn read_file(path: &Path) -> Result<Vec<u8>, Pdf2SumError> {
    let path_buf = || path.to_path_buf();
    std::fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => Pdf2SumError::FileNotFound { path: path_buf() },
        std::io::ErrorKind::PermissionDenied => {
            Pdf2SumError::PermissionDenied { path: path_buf() }
        }
        _ => Pdf2SumError::ReadFailed {
            path: path_buf(),
            source,
        },
    })
}

fn load_document(bytes: &[u8], path: &Path) -> Result<Document, Pdf2SumError> {
    input::check_magic(bytes, path)?;
    Document::load_mem(bytes).map_err(|e| Pdf2SumError::CorruptPdf {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Blocking implementation of text extraction.
fn parse_document(bytes: &[u8], path: &Path) -> Result<ExtractedDocument, Pdf2SumError> {
    let document = load_document(bytes, path)?;
    let metadata = read_metadata(&document);
    info!("PDF loaded: {} pages", metadata.page_count);

    // `get_pages` is a BTreeMap keyed by 1-based page number, so iteration
    // is already in page order.
    let mut text = String::new();
    for &page_num in document.get_pages().keys() {
        let page_text = document.extract_text(&[page_num]).map_err(|e| {
            Pdf2SumError::TextExtractionFailed {
                path: path.to_path_buf(),
                page: page_num,
                detail: e.to_string(),
            }
        })?;
        debug!("Page {}: {} chars", page_num, page_text.chars().count());
        text.push_str(&page_text);
    }

    Ok(ExtractedDocument { text, metadata })
}

fn read_metadata(document: &Document) -> DocumentMetadata {
    let info = info_dictionary(document);
    let field = |key: &[u8]| info.and_then(|d| string_field(d, key));

    DocumentMetadata {
        title: field(b"Title"),
        author: field(b"Author"),
        subject: field(b"Subject"),
        creator: field(b"Creator"),
        producer: field(b"Producer"),
        page_count: document.get_pages().len(),
        pdf_version: document.version.clone(),
        is_encrypted: document.trailer.get(b"Encrypt").is_ok(),
    }
}

fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn string_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            let value = decode_pdf_string(bytes);
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        }
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a BOM, otherwise
/// one byte per character.
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_utf16_with_bom() {
        let bytes = [0xFE, 0xFF, 0x00, b'H', 0x00, 0xE9];
        assert_eq!(decode_pdf_string(&bytes), "Hé");
    }

    #[test]
    fn decode_single_byte() {
        assert_eq!(decode_pdf_string(b"Report"), "Report");
    }

    #[tokio::test]
    async fn garbage_after_magic_is_corrupt() {
        let err = read_bytes(b"%PDF-1.4 this is not a pdf".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, Pdf2SumError::CorruptPdf { .. }), "got {err}");
    }

    #[tokio::test]
    async fn missing_file_surfaces_as_read_error() {
        let err = read_text("/no/such/input.pdf").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::DocumentRead);
    }
}
