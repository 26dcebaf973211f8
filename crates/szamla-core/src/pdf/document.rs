//! PDF loading and per-page text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::Result;
use crate::error::PdfError;

/// An in-memory PDF with extractable text.
pub struct PdfDocument {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfDocument {
    /// Load a PDF from bytes.
    ///
    /// PDFs encrypted with an empty password are decrypted transparently;
    /// anything else encrypted is rejected.
    pub fn load(data: &[u8]) -> Result<Self> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes for the fallback path.
            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("loaded PDF with {} pages", page_count);
        Ok(Self {
            document: doc,
            raw_data,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Text of each page in order. A page without a text layer yields `None`.
    ///
    /// When lopdf cannot tokenize any page, the whole document is run through
    /// pdf-extract once and returned as a single entry.
    pub fn page_texts(&self) -> Vec<Option<String>> {
        let pages: Vec<u32> = self.document.get_pages().keys().copied().collect();

        let mut texts: Vec<Option<String>> = pages
            .iter()
            .map(|&number| match self.document.extract_text(&[number]) {
                Ok(text) if !text.trim().is_empty() => Some(text),
                Ok(_) => None,
                Err(e) => {
                    debug!("no text layer on page {}: {}", number, e);
                    None
                }
            })
            .collect();

        if texts.iter().all(|t| t.is_none()) {
            if let Ok(text) = pdf_extract::extract_text_from_mem(&self.raw_data) {
                if !text.trim().is_empty() {
                    debug!("recovered text via whole-document fallback");
                    texts = vec![Some(text)];
                }
            }
        }

        texts
    }

    /// Text of the entire document as one string.
    pub fn text(&self) -> Result<String> {
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_rejects_garbage() {
        let result = PdfDocument::load(b"not a pdf at all");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_empty_input() {
        assert!(PdfDocument::load(&[]).is_err());
    }
}
