//! Text extraction from uploaded CV documents.
//!
//! PDF files are read page by page: text items within a page are joined with
//! single spaces, pages with double newlines, and a page whose extraction
//! fails is logged and skipped so partial results survive. If the
//! page-oriented pass yields nothing, a whole-document pass with a second
//! text engine (`pdf-extract`) runs before giving up.
//!
//! Word documents are read as raw bytes with no structural parsing. This is
//! a known limitation: binary .doc and zipped .docx content mostly will not
//! survive a lossy UTF-8 decode.

use thiserror::Error;
use tracing::warn;

/// Extracted text below this many trimmed characters is rejected by callers
/// as insufficient to build a profile from.
pub const MIN_TEXT_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Failed to load document: {0}")]
    Load(String),

    #[error("Failed to extract text from page {page}: {message}")]
    Page { page: usize, message: String },

    #[error(
        "Could not extract any text from the document. It may be scanned or contain only images."
    )]
    NoText,
}

/// The four accepted upload media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    WordLegacy,
    WordXml,
    PlainText,
}

impl MediaType {
    pub fn from_mime(mime: &str) -> Result<MediaType, ExtractError> {
        match mime {
            "application/pdf" => Ok(MediaType::Pdf),
            "application/msword" => Ok(MediaType::WordLegacy),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Ok(MediaType::WordXml)
            }
            "text/plain" => Ok(MediaType::PlainText),
            other => Err(ExtractError::UnsupportedType(other.to_string())),
        }
    }
}

/// A page-oriented text source. Pages are 0-indexed here and reported
/// 1-indexed in logs and errors.
pub trait PageSource {
    fn page_count(&self) -> usize;
    fn page_text(&self, page: usize) -> Result<String, ExtractError>;
}

/// Production page source backed by lopdf.
pub struct PdfPageSource {
    doc: lopdf::Document,
    page_numbers: Vec<u32>,
}

impl PdfPageSource {
    pub fn load(bytes: &[u8]) -> Result<PdfPageSource, ExtractError> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Load(e.to_string()))?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        Ok(PdfPageSource { doc, page_numbers })
    }
}

impl PageSource for PdfPageSource {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, page: usize) -> Result<String, ExtractError> {
        let page_number = self.page_numbers[page];
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| ExtractError::Page {
                page: page + 1,
                message: e.to_string(),
            })
    }
}

/// Concatenates all pages of a source, tolerating individual page failures.
///
/// Fails with `NoText` only when nothing at all could be extracted.
pub fn collect_pages(source: &dyn PageSource) -> Result<String, ExtractError> {
    let mut pages = Vec::new();

    for i in 0..source.page_count() {
        match source.page_text(i) {
            Ok(text) => {
                let normalized = normalize_page(&text);
                if !normalized.is_empty() {
                    pages.push(normalized);
                }
            }
            Err(e) => {
                // Partial results are acceptable; continue with other pages.
                warn!("Error extracting text from page {}: {e}", i + 1);
            }
        }
    }

    let full_text = pages.join("\n\n");
    if full_text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(full_text)
}

/// Joins a page's text items with single spaces.
fn normalize_page(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts plain text from an uploaded file of the given media type.
pub fn extract_text(media_type: MediaType, bytes: &[u8]) -> Result<String, ExtractError> {
    match media_type {
        MediaType::Pdf => extract_pdf_text(bytes),
        MediaType::WordLegacy | MediaType::WordXml | MediaType::PlainText => {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let page_result = PdfPageSource::load(bytes).and_then(|source| collect_pages(&source));

    match page_result {
        Ok(text) => Ok(text),
        Err(e) => {
            // Second engine: some documents that defeat the page-oriented
            // pass still yield text to pdf-extract's whole-document walk.
            warn!("Page-oriented PDF extraction failed ({e}); trying whole-document pass");
            let text = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ExtractError::Load(e.to_string()))?;
            if text.trim().is_empty() {
                return Err(ExtractError::NoText);
            }
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSource {
        pages: Vec<Result<String, String>>,
    }

    impl PageSource for MockSource {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, page: usize) -> Result<String, ExtractError> {
            match &self.pages[page] {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(ExtractError::Page {
                    page: page + 1,
                    message: message.clone(),
                }),
            }
        }
    }

    #[test]
    fn test_failing_page_is_skipped() {
        let source = MockSource {
            pages: vec![
                Ok("Page one text".to_string()),
                Err("damaged stream".to_string()),
                Ok("Page three text".to_string()),
            ],
        };
        let text = collect_pages(&source).unwrap();
        assert_eq!(text, "Page one text\n\nPage three text");
    }

    #[test]
    fn test_all_pages_failing_is_no_text() {
        let source = MockSource {
            pages: vec![Err("bad".to_string()), Err("bad".to_string())],
        };
        assert!(matches!(collect_pages(&source), Err(ExtractError::NoText)));
    }

    #[test]
    fn test_whitespace_only_pages_are_no_text() {
        let source = MockSource {
            pages: vec![Ok("   \n\t ".to_string())],
        };
        assert!(matches!(collect_pages(&source), Err(ExtractError::NoText)));
    }

    #[test]
    fn test_page_text_items_joined_with_single_spaces() {
        let source = MockSource {
            pages: vec![Ok("Ada   Lovelace\nAnalytical\tEngine".to_string())],
        };
        let text = collect_pages(&source).unwrap();
        assert_eq!(text, "Ada Lovelace Analytical Engine");
    }

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(
            MediaType::from_mime("application/pdf").unwrap(),
            MediaType::Pdf
        );
        assert_eq!(
            MediaType::from_mime("text/plain").unwrap(),
            MediaType::PlainText
        );
        assert_eq!(
            MediaType::from_mime("application/msword").unwrap(),
            MediaType::WordLegacy
        );
        assert_eq!(
            MediaType::from_mime(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            )
            .unwrap(),
            MediaType::WordXml
        );
        assert!(matches!(
            MediaType::from_mime("image/png"),
            Err(ExtractError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_text(MediaType::PlainText, b"Hello resume").unwrap();
        assert_eq!(text, "Hello resume");
    }

    #[test]
    fn test_word_bytes_decoded_lossily() {
        let bytes = [b'C', b'V', 0xFF, b'!'];
        let text = extract_text(MediaType::WordLegacy, &bytes).unwrap();
        assert!(text.starts_with("CV"));
        assert!(text.ends_with('!'));
    }

    #[test]
    fn test_garbage_pdf_fails_to_load() {
        let result = extract_text(MediaType::Pdf, b"definitely not a pdf");
        assert!(result.is_err());
    }
}
