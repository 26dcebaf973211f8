//! Locale pattern table for field extraction.
//!
//! Date shapes, currency tokens, and label lexicons are data, not code:
//! adding a locale means adding another constructor that fills the same
//! table.

use regex::Regex;

/// How a locale writes decimal fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalStyle {
    /// Comma is the decimal separator; periods separate thousands.
    Comma,
    /// Period is the decimal separator; commas separate thousands.
    Dot,
}

/// Patterns and tokens for one locale.
#[derive(Debug, Clone)]
pub struct LocaleProfile {
    tag: &'static str,
    date_patterns: Vec<Regex>,
    decimal_style: DecimalStyle,
    currency_tokens: Vec<&'static str>,
    amount_pattern: Regex,
    issue_date_labels: Vec<&'static str>,
    due_date_labels: Vec<&'static str>,
    total_labels: Vec<&'static str>,
}

impl LocaleProfile {
    /// Hungarian invoices: `2023. 10. 25.` long dates, `1 234,56 Ft` amounts.
    pub fn hungarian() -> Self {
        Self::build(
            "hu",
            &[
                // Regional long form first: optional spaces between groups,
                // optional trailing period.
                r"\b\d{4}\.\s*\d{1,2}\.\s*\d{1,2}\.?",
                r"\b\d{4}-\d{2}-\d{2}\b",
                r"\b\d{2}/\d{2}/\d{4}\b",
            ],
            DecimalStyle::Comma,
            &["Ft", "HUF"],
            &["kiállítás", "kelte", "kelt", "issue"],
            &["fizetési határidő", "határidő", "esedékesség", "due"],
            &["összesen", "fizetendő", "total"],
        )
    }

    /// Look up a built-in profile by tag.
    pub fn for_tag(tag: &str) -> Option<Self> {
        match tag {
            "hu" => Some(Self::hungarian()),
            _ => None,
        }
    }

    fn build(
        tag: &'static str,
        date_patterns: &[&str],
        decimal_style: DecimalStyle,
        currency_tokens: &[&'static str],
        issue_date_labels: &[&'static str],
        due_date_labels: &[&'static str],
        total_labels: &[&'static str],
    ) -> Self {
        let date_patterns = date_patterns
            .iter()
            .map(|p| Regex::new(p).expect("invalid date pattern"))
            .collect();

        // A digit-led run of digits/separators followed by a currency token.
        let alternation = currency_tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let amount_pattern = Regex::new(&format!(r"(?i)(\d[\d\s.,]*)\s*(?:{})", alternation))
            .expect("invalid amount pattern");

        Self {
            tag,
            date_patterns,
            decimal_style,
            currency_tokens: currency_tokens.to_vec(),
            amount_pattern,
            issue_date_labels: issue_date_labels.to_vec(),
            due_date_labels: due_date_labels.to_vec(),
            total_labels: total_labels.to_vec(),
        }
    }

    pub fn tag(&self) -> &str {
        self.tag
    }

    /// Date token shapes in priority order.
    pub fn date_patterns(&self) -> &[Regex] {
        &self.date_patterns
    }

    pub fn decimal_style(&self) -> DecimalStyle {
        self.decimal_style
    }

    pub fn currency_tokens(&self) -> &[&'static str] {
        &self.currency_tokens
    }

    /// Currency-tagged numeric run; capture group 1 is the numeric part.
    pub fn amount_pattern(&self) -> &Regex {
        &self.amount_pattern
    }

    pub fn issue_date_labels(&self) -> &[&'static str] {
        &self.issue_date_labels
    }

    pub fn due_date_labels(&self) -> &[&'static str] {
        &self.due_date_labels
    }

    pub fn total_labels(&self) -> &[&'static str] {
        &self.total_labels
    }
}

impl Default for LocaleProfile {
    fn default() -> Self {
        Self::hungarian()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_tag() {
        assert!(LocaleProfile::for_tag("hu").is_some());
        assert!(LocaleProfile::for_tag("xx").is_none());
    }

    #[test]
    fn test_hungarian_date_pattern_priority() {
        let locale = LocaleProfile::hungarian();
        let patterns = locale.date_patterns();

        // The regional long form outranks ISO and slash forms.
        assert!(patterns[0].is_match("2023. 10. 25."));
        assert!(patterns[0].is_match("2023.10.25"));
        assert!(patterns[1].is_match("2023-10-25"));
        assert!(patterns[2].is_match("25/10/2023"));
    }

    #[test]
    fn test_amount_pattern_matches_currency_tokens() {
        let locale = LocaleProfile::hungarian();
        let pattern = locale.amount_pattern();

        assert!(pattern.is_match("1 200 Ft"));
        assert!(pattern.is_match("1200 HUF"));
        assert!(pattern.is_match("1200 huf"));
        assert!(!pattern.is_match("1200 EUR"));
    }
}
