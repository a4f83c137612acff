//! Text extraction from uploaded documents.

use async_trait::async_trait;
use lopdf::Document;
use tracing::debug;

pub const PAGE_SEPARATOR: char = '\n';

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Please upload a valid PDF file.")]
    NotPdf,

    #[error("Could not read the PDF: {0}")]
    Parse(#[from] lopdf::Error),

    #[error("The PDF contains no extractable text.")]
    NoText,
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Text of every page, in page order.
    async fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;

    /// All pages joined into the single text that rides along with the next send.
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let pages = self.extract_pages(bytes).await?;
        let text = join_pages(&pages);
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }
        Ok(text)
    }
}

pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut joined = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            joined.push(PAGE_SEPARATOR);
        }
        joined.push_str(page.as_ref());
    }
    joined
}

/// The header may sit anywhere in the first kilobyte.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|window| window == b"%PDF-")
}

/// Extracts text with `lopdf`, one page at a time in page order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

// Runs of whitespace inside a page collapse to single spaces, so the only line breaks in the
// joined text are page boundaries.
fn normalize_page(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn read_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let document = Document::load_mem(bytes)?;
    let page_numbers: Vec<u32> = document.get_pages().into_keys().collect();
    let mut pages = Vec::with_capacity(page_numbers.len());
    for number in page_numbers {
        let raw = document.extract_text(&[number])?;
        pages.push(normalize_page(&raw));
    }
    Ok(pages)
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        if !looks_like_pdf(bytes) {
            return Err(ExtractionError::NotPdf);
        }

        let pages = read_pages(bytes)?;
        debug!(pages = pages.len(), "extracted pdf text");
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_pages_with_newline() {
        assert_eq!(join_pages(&["a", "b", "c"]), "a\nb\nc");
        assert_eq!(join_pages(&["only"]), "only");
        assert_eq!(join_pages::<&str>(&[]), "");
    }

    #[test]
    fn detects_pdf_header() {
        assert!(looks_like_pdf(b"%PDF-1.7\n..."));
        assert!(looks_like_pdf(b"\xef\xbb\xbf%PDF-1.4"));
        assert!(!looks_like_pdf(b"PK\x03\x04 zip archive"));
        assert!(!looks_like_pdf(b""));
    }

    #[test]
    fn normalizes_whitespace_within_a_page() {
        assert_eq!(normalize_page("Hello\n  World!\n"), "Hello World!");
    }

    #[tokio::test]
    async fn rejects_non_pdf_bytes() {
        let err = PdfExtractor::new()
            .extract_text(b"just some text")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NotPdf));
        assert_eq!(err.to_string(), "Please upload a valid PDF file.");
    }

    #[tokio::test]
    async fn truncated_pdf_is_a_parse_error() {
        let err = PdfExtractor::new()
            .extract_text(b"%PDF-1.5\n1 0 obj\n<<")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Parse(_)));
    }
}
