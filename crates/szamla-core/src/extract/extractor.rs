//! Record assembly: runs every field rule against the normalized text.

use tracing::debug;

use super::rules::amounts::{scan_amounts, AmountSelectionStrategy, MaxAmount};
use super::rules::dates::extract_dates;
use super::rules::patterns::{BUYER_LABEL, COMMENT_LABEL, INVOICE_NUMBER, PAYMENT_REQUEST};
use super::rules::tax_id::TaxIdExtractor;
use super::FieldExtractor;
use crate::error::PdfError;
use crate::models::locale::LocaleProfile;
use crate::models::record::{DocumentType, ExtractedRecord};
use crate::normalize::normalize_pages;
use crate::pdf::PdfDocument;

/// Placeholder vendor for documents with no usable text. Downstream rows
/// rely on this sentinel rather than an absent value.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// Heuristic field extractor.
///
/// Extraction is a pure function of the input text: no cross-call state, no
/// I/O, and every field degrades to `None` on its own. Running it twice on
/// the same text yields the same record.
pub struct RecordExtractor {
    locale: LocaleProfile,
    strategy: Box<dyn AmountSelectionStrategy>,
    validate_tax_id: bool,
}

impl RecordExtractor {
    /// Create an extractor with the Hungarian locale and the max-amount
    /// total heuristic.
    pub fn new() -> Self {
        Self {
            locale: LocaleProfile::hungarian(),
            strategy: Box::new(MaxAmount),
            validate_tax_id: true,
        }
    }

    /// Set the locale table.
    pub fn with_locale(mut self, locale: LocaleProfile) -> Self {
        self.locale = locale;
        self
    }

    /// Replace the total-selection strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn AmountSelectionStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set tax id checksum validation.
    pub fn with_tax_id_validation(mut self, validate: bool) -> Self {
        self.validate_tax_id = validate;
        self
    }

    /// Extract a record from normalized text.
    pub fn extract(&self, text: &str) -> ExtractedRecord {
        debug!("extracting record from {} characters of text", text.len());

        let dates = extract_dates(text, &self.locale);

        let candidates = scan_amounts(text, &self.locale);
        let amount = self.strategy.select(&candidates);

        let vendor_tax_id = TaxIdExtractor::new()
            .with_validation(self.validate_tax_id)
            .extract(text)
            .map(|m| m.value);

        ExtractedRecord {
            document_type: self.detect_document_type(text),
            invoice_number: self.extract_invoice_number(text),
            vendor_name: Some(self.extract_vendor(text)),
            vendor_tax_id,
            issue_date: dates.issue_date,
            due_date: dates.due_date,
            amount,
            buyer_name: self.extract_buyer(text),
            comment: self.extract_comment(text),
            file_url: None,
        }
    }

    /// Load a PDF, recover its text, and extract a record from it.
    pub fn extract_from_pdf(&self, data: &[u8]) -> Result<ExtractedRecord, PdfError> {
        let document = PdfDocument::load(data)?;
        let pages = document.page_texts();
        let text = normalize_pages(&pages);
        Ok(self.extract(&text))
    }

    fn detect_document_type(&self, text: &str) -> DocumentType {
        if PAYMENT_REQUEST.is_match(text) {
            DocumentType::PaymentRequest
        } else {
            DocumentType::Invoice
        }
    }

    fn extract_invoice_number(&self, text: &str) -> Option<String> {
        INVOICE_NUMBER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    /// First non-blank line of the text, taken verbatim as the vendor guess.
    fn extract_vendor(&self, text: &str) -> String {
        text.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
    }

    fn extract_buyer(&self, text: &str) -> Option<String> {
        let caps = BUYER_LABEL.captures(text)?;
        let inline = caps[1].trim().to_string();
        if !inline.is_empty() {
            return Some(inline);
        }

        // Caption alone on its line: the name is on the next non-blank line.
        let after = &text[caps.get(0).unwrap().end()..];
        after
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }

    fn extract_comment(&self, text: &str) -> Option<String> {
        COMMENT_LABEL
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|comment| !comment.is_empty())
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_extract_full_invoice() {
        let text = "\
Acme Kft.
1052 Budapest, Váci utca 1.
Adószám: 12345676-2-41

Számla sorszáma: 2023/00123
Számla kelte: 2023. 10. 25.
Fizetési határidő: 2023. 11. 08.

Vevő: Teszt Zrt.

Nettó összeg: 20 000 Ft
ÁFA (27%): 5 400 Ft
Fizetendő összeg: 25 400 Ft

Megjegyzés: átutalással kérjük";

        let record = RecordExtractor::new().extract(text);

        assert_eq!(record.document_type, DocumentType::Invoice);
        assert_eq!(record.invoice_number.as_deref(), Some("2023/00123"));
        assert_eq!(record.vendor_name.as_deref(), Some("Acme Kft."));
        assert_eq!(record.vendor_tax_id.as_deref(), Some("12345676-2-41"));
        assert_eq!(record.issue_date.as_deref(), Some("2023. 10. 25."));
        assert_eq!(record.due_date.as_deref(), Some("2023. 11. 08."));
        assert_eq!(record.amount, Some(Decimal::from_str("25400").unwrap()));
        assert_eq!(record.buyer_name.as_deref(), Some("Teszt Zrt."));
        assert_eq!(record.comment.as_deref(), Some("átutalással kérjük"));
        assert_eq!(record.file_url, None);
    }

    #[test]
    fn test_vendor_is_first_non_blank_line() {
        let record = RecordExtractor::new().extract("\n\nAcme Kft.\nAddress line\n");
        assert_eq!(record.vendor_name.as_deref(), Some("Acme Kft."));
    }

    #[test]
    fn test_empty_text_degrades_to_defaults() {
        let record = RecordExtractor::new().extract("");

        assert_eq!(record.document_type, DocumentType::Invoice);
        assert_eq!(record.vendor_name.as_deref(), Some(UNKNOWN_VENDOR));
        assert_eq!(record.invoice_number, None);
        assert_eq!(record.vendor_tax_id, None);
        assert_eq!(record.issue_date, None);
        assert_eq!(record.due_date, None);
        assert_eq!(record.amount, None);
        assert_eq!(record.buyer_name, None);
        assert_eq!(record.comment, None);
    }

    #[test]
    fn test_payment_request_detected() {
        let record = RecordExtractor::new().extract("DÍJBEKÉRŐ\nAcme Kft.\n1 000 Ft");
        assert_eq!(record.document_type, DocumentType::PaymentRequest);
    }

    #[test]
    fn test_buyer_on_following_line() {
        let text = "Acme Kft.\nVevő:\n\nTeszt Zrt.\nBudapest";
        let record = RecordExtractor::new().extract(text);
        assert_eq!(record.buyer_name.as_deref(), Some("Teszt Zrt."));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "Acme Kft.\nSzámla kelte: 2023. 10. 25.\nÖsszesen: 12 500 Ft";
        let extractor = RecordExtractor::new();

        let first = extractor.extract(text);
        let second = extractor.extract(text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fields_degrade_independently() {
        // An amount with no other recognizable field, and vice versa.
        let record = RecordExtractor::new().extract("valami\n999 Ft");
        assert_eq!(record.amount, Some(Decimal::from_str("999").unwrap()));
        assert_eq!(record.issue_date, None);

        let record = RecordExtractor::new().extract("valami\n2023-10-25");
        assert_eq!(record.amount, None);
        assert_eq!(record.issue_date.as_deref(), Some("2023-10-25"));
    }
}
