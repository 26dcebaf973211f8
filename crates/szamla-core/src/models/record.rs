//! The structured record produced by invoice field extraction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of billing document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Final invoice (számla).
    #[default]
    Invoice,

    /// Payment request issued ahead of the invoice (díjbekérő).
    PaymentRequest,
}

impl DocumentType {
    /// Hungarian label, as used on the spreadsheet.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Számla",
            DocumentType::PaymentRequest => "Díjbekérő",
        }
    }
}

/// Best-effort structured data recovered from a single document.
///
/// Every field is independently optional: a field that could not be found is
/// `None`, never an error, and one field's absence does not affect another.
/// A record is created fresh per document and never cached or merged.
///
/// `file_url` is not produced by extraction; the caller fills it in after
/// uploading the original document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub document_type: DocumentType,
    pub invoice_number: Option<String>,
    pub vendor_name: Option<String>,
    pub vendor_tax_id: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub amount: Option<Decimal>,
    pub buyer_name: Option<String>,
    pub comment: Option<String>,
    pub file_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_document_type_labels() {
        assert_eq!(DocumentType::Invoice.label(), "Számla");
        assert_eq!(DocumentType::PaymentRequest.label(), "Díjbekérő");
        assert_eq!(DocumentType::default(), DocumentType::Invoice);
    }

    #[test]
    fn test_record_round_trip_preserves_nulls() {
        let record = ExtractedRecord {
            document_type: DocumentType::PaymentRequest,
            invoice_number: Some("2024/00042".to_string()),
            vendor_name: Some("Acme Kft.".to_string()),
            vendor_tax_id: None,
            issue_date: Some("2024. 01. 15.".to_string()),
            due_date: None,
            amount: Some(Decimal::from_str("15000.50").unwrap()),
            buyer_name: None,
            comment: None,
            file_url: None,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: ExtractedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);

        // Absent fields serialize as explicit nulls in the flat mapping.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("vendor_tax_id").unwrap().is_null());
        assert!(value.get("due_date").unwrap().is_null());
        assert_eq!(value["document_type"], "payment_request");
    }
}
