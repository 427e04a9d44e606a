//! Text extraction contract and cleanup for extracted text.

use async_trait::async_trait;

use crate::error::{CoreError, Result};

/// Extracts raw text from an uploaded file.
///
/// Real implementations wrap a PDF parser; [`PlainTextExtractor`] decodes
/// UTF-8 directly and doubles as a deterministic extractor for tests.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of the file.
    ///
    /// Fails with [`CoreError::Extraction`] on corrupt, encrypted, or
    /// undecodable content.
    async fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

/// Normalize extracted text.
///
/// Collapses runs of whitespace to single spaces and drops parser artifacts
/// (NUL bytes, U+FFFD replacement characters). The result is trimmed.
pub fn clean_extracted_text(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.replace(['\u{0}', '\u{FFFD}'], ""))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Treats the upload as UTF-8 text and cleans it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(bytes).map_err(|e| CoreError::Extraction {
            message: format!("content is not valid UTF-8: {e}"),
        })?;
        Ok(clean_extracted_text(text))
    }
}
