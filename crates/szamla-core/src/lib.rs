//! Core library for Hungarian invoice processing.
//!
//! This crate provides:
//! - PDF text recovery (lopdf with a pdf-extract fallback)
//! - Normalization of per-page text into a single searchable blob
//! - Heuristic invoice field extraction (dates, amounts, tax id, parties)
//! - The `ExtractedRecord` data model consumed by the pipeline

pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pdf;

pub use error::PdfError;
pub use extract::rules::amounts::{
    AmountCandidate, AmountSelectionStrategy, LabelAnchored, MaxAmount,
};
pub use extract::{ExtractionMatch, FieldExtractor, RecordExtractor, UNKNOWN_VENDOR};
pub use models::locale::{DecimalStyle, LocaleProfile};
pub use models::record::{DocumentType, ExtractedRecord};
pub use normalize::normalize_pages;
pub use pdf::PdfDocument;
