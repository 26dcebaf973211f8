//! Error types for the szamla-core library.

use thiserror::Error;

/// Errors related to PDF processing.
///
/// Field extraction itself is infallible; an unusable document is the only
/// failure the core reports, and the caller decides whether that aborts the
/// document or degrades to an empty record.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF bytes.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}
