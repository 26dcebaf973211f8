//! Rule-based field extractors for Hungarian invoices.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod tax_id;

pub use amounts::{
    normalize_amount, scan_amounts, AmountCandidate, AmountSelectionStrategy, LabelAnchored,
    MaxAmount,
};
pub use dates::{extract_dates, ExtractedDates};
pub use tax_id::{extract_tax_id, validate_tax_id, TaxIdExtractor};
