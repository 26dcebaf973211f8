//! Common regex patterns for Hungarian invoice extraction.
//!
//! Locale-dependent shapes (dates, currency) live in
//! [`crate::models::locale::LocaleProfile`]; the label patterns here anchor
//! individual fields to their printed Hungarian/English captions.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Tax id (adószám): 8-digit base, VAT code, county code.
    pub static ref TAX_ID_LABELED: Regex = Regex::new(
        r"(?i)ad[óo]sz[áa]m(?:a)?[\s:]*(\d{8})[\s-]?(\d)[\s-]?(\d{2})"
    ).unwrap();

    pub static ref TAX_ID_STANDALONE: Regex = Regex::new(
        r"\b(\d{8})-(\d)-(\d{2})\b"
    ).unwrap();

    // Invoice / payment-request serial number.
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:sz[áa]mla\s+sorsz[áa]ma|sz[áa]mlasz[áa]m|d[íi]jbek[ée]r[őo]\s+sorsz[áa]ma|sorsz[áa]m|bizonylatsz[áa]m|invoice\s+(?:no\.?|number))[\s:.]*([A-Za-z0-9/_-]+)"
    ).unwrap();

    // Buyer caption at the start of a line.
    pub static ref BUYER_LABEL: Regex = Regex::new(
        r"(?mi)^\s*(?:vev[őo](?:\s+neve)?|buyer)\b\s*:?\s*(.*)$"
    ).unwrap();

    // Free-text remark caption.
    pub static ref COMMENT_LABEL: Regex = Regex::new(
        r"(?mi)^\s*(?:megjegyz[ée]s|k[öo]zlem[ée]ny)\b\s*:?\s*(.*)$"
    ).unwrap();

    // Document type marker: the word anywhere flips the record to a
    // payment request.
    pub static ref PAYMENT_REQUEST: Regex = Regex::new(
        r"(?i)d[íi]jbek[ée]r[őo]"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_id_labeled_variants() {
        assert!(TAX_ID_LABELED.is_match("Adószám: 12345676-2-41"));
        assert!(TAX_ID_LABELED.is_match("Adószáma: 12345676 2 41"));
        assert!(TAX_ID_LABELED.is_match("adószám 12345676-2-41"));
    }

    #[test]
    fn test_invoice_number_variants() {
        let caps = INVOICE_NUMBER.captures("Számla sorszáma: 2024/00042").unwrap();
        assert_eq!(&caps[1], "2024/00042");

        let caps = INVOICE_NUMBER.captures("Díjbekérő sorszáma: DB-2024-7").unwrap();
        assert_eq!(&caps[1], "DB-2024-7");
    }

    #[test]
    fn test_buyer_label_does_not_match_inside_words() {
        assert!(BUYER_LABEL.is_match("Vevő: Acme Kft."));
        assert!(BUYER_LABEL.is_match("Vevő neve: Acme Kft."));
        assert!(!BUYER_LABEL.is_match("vevőszolgálat elérhetősége"));
    }

    #[test]
    fn test_payment_request_marker() {
        assert!(PAYMENT_REQUEST.is_match("DÍJBEKÉRŐ"));
        assert!(PAYMENT_REQUEST.is_match("dijbekero"));
        assert!(!PAYMENT_REQUEST.is_match("számla"));
    }
}
