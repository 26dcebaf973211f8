//! Hungarian tax number (adószám) extraction and validation.

use super::patterns::{TAX_ID_LABELED, TAX_ID_STANDALONE};
use crate::extract::{ExtractionMatch, FieldExtractor};

/// Tax id field extractor.
pub struct TaxIdExtractor {
    validate: bool,
}

impl TaxIdExtractor {
    pub fn new() -> Self {
        Self { validate: true }
    }

    /// Set whether to validate the 8-digit base checksum.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl Default for TaxIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TaxIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // Labeled occurrences first.
        for caps in TAX_ID_LABELED.captures_iter(text) {
            let tax_id = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);

            if !self.validate || validate_tax_id(&tax_id) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(tax_id, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // Standalone occurrences of the printed dashed form.
        for caps in TAX_ID_STANDALONE.captures_iter(text) {
            let tax_id = format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);

            if results.iter().any(|r| r.value == tax_id) {
                continue;
            }

            if !self.validate || validate_tax_id(&tax_id) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::new(tax_id, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Extract the first tax id from text.
pub fn extract_tax_id(text: &str) -> Option<String> {
    TaxIdExtractor::new().extract(text).map(|m| m.value)
}

/// Validate the checksum of the 8-digit base of a Hungarian tax number.
///
/// The 8th digit is a check digit over the first seven, with weights
/// 9, 7, 3, 1, 9, 7, 3.
pub fn validate_tax_id(tax_id: &str) -> bool {
    let digits: Vec<u32> = tax_id.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }

    let weights = [9, 7, 3, 1, 9, 7, 3];
    let sum: u32 = digits
        .iter()
        .take(7)
        .zip(weights.iter())
        .map(|(d, w)| d * w)
        .sum();

    let check = (10 - (sum % 10)) % 10;
    check == digits[7]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tax_id_valid() {
        // 1234567 with weights 9,7,3,1,9,7,3 sums to 144, check digit 6.
        assert!(validate_tax_id("12345676-2-41"));
        assert!(validate_tax_id("12345676241"));
    }

    #[test]
    fn test_validate_tax_id_invalid() {
        assert!(!validate_tax_id("12345678-2-41")); // bad check digit
        assert!(!validate_tax_id("1234567-2-41")); // too short
        assert!(!validate_tax_id("123456761-2-41")); // too long
    }

    #[test]
    fn test_extract_labeled() {
        let text = "Kibocsátó: Acme Kft.\nAdószám: 12345676-2-41\nBudapest";
        assert_eq!(extract_tax_id(text), Some("12345676-2-41".to_string()));
    }

    #[test]
    fn test_extract_standalone() {
        let text = "Acme Kft. (12345676-2-41), Budapest";
        assert_eq!(extract_tax_id(text), Some("12345676-2-41".to_string()));
    }

    #[test]
    fn test_checksum_rejects_without_validation_off() {
        let text = "Adószám: 12345678-2-41";
        assert_eq!(extract_tax_id(text), None);

        let relaxed = TaxIdExtractor::new().with_validation(false);
        assert_eq!(
            relaxed.extract(text).map(|m| m.value),
            Some("12345678-2-41".to_string())
        );
    }

    #[test]
    fn test_no_tax_id_yields_none() {
        assert_eq!(extract_tax_id("no identifiers here"), None);
    }
}
