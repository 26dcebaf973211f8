//! Amount extraction: currency-tagged candidates and total selection.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::trace;

use crate::models::locale::{DecimalStyle, LocaleProfile};

/// A currency-tagged numeric substring, parsed but not yet selected.
#[derive(Debug, Clone)]
pub struct AmountCandidate {
    /// Parsed numeric value.
    pub value: Decimal,
    /// The numeric text as matched, whitespace-trimmed.
    pub raw: String,
    /// Byte span of the full match in the source text.
    pub span: (usize, usize),
    /// The line the candidate sits on, for label-aware strategies.
    pub line: String,
}

/// Scan the text for every currency-tagged number and parse each one.
/// Candidates that fail to parse are dropped.
pub fn scan_amounts(text: &str, locale: &LocaleProfile) -> Vec<AmountCandidate> {
    let mut candidates = Vec::new();

    for caps in locale.amount_pattern().captures_iter(text) {
        let group = caps.get(1).unwrap();
        let raw = group.as_str().trim().to_string();

        let Some(value) = normalize_amount(&raw, locale.decimal_style()) else {
            trace!("discarding unparsable amount candidate {:?}", raw);
            continue;
        };

        let full = caps.get(0).unwrap();
        candidates.push(AmountCandidate {
            value,
            raw,
            span: (full.start(), full.end()),
            line: enclosing_line(text, full.start()).to_string(),
        });
    }

    candidates
}

/// Normalize a raw numeric string to a decimal value.
///
/// Internal whitespace is stripped. Under [`DecimalStyle::Comma`], a comma
/// marks the decimal point and any periods are thousands separators; with no
/// comma present, periods are kept verbatim, so `1.234` parses as `1.234`
/// rather than `1234`. That ambiguity is resolved deterministically, never
/// "fixed".
pub fn normalize_amount(raw: &str, style: DecimalStyle) -> Option<Decimal> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.trim_end_matches(['.', ',']);

    let normalized = match style {
        DecimalStyle::Comma if compact.contains(',') => {
            compact.replace('.', "").replace(',', ".")
        }
        DecimalStyle::Comma => compact.to_string(),
        DecimalStyle::Dot => compact.replace(',', ""),
    };

    Decimal::from_str(&normalized).ok()
}

fn enclosing_line(text: &str, pos: usize) -> &str {
    let start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len());
    text[start..end].trim()
}

/// Picks the invoice total from the parsed candidates.
pub trait AmountSelectionStrategy: Send + Sync {
    fn select(&self, candidates: &[AmountCandidate]) -> Option<Decimal>;
}

/// Grand-total heuristic: the largest currency-tagged figure on the page
/// wins, on the assumption that subtotals, taxes, and line items are
/// smaller. A heuristic, not a guarantee.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxAmount;

impl AmountSelectionStrategy for MaxAmount {
    fn select(&self, candidates: &[AmountCandidate]) -> Option<Decimal> {
        candidates.iter().map(|c| c.value).max()
    }
}

/// Prefers candidates whose line carries a total label ("Összesen",
/// "Fizetendő"), falling back to the overall maximum when none is labeled.
#[derive(Debug, Clone)]
pub struct LabelAnchored {
    labels: Vec<String>,
}

impl LabelAnchored {
    pub fn new(locale: &LocaleProfile) -> Self {
        Self {
            labels: locale
                .total_labels()
                .iter()
                .map(|l| l.to_lowercase())
                .collect(),
        }
    }
}

impl AmountSelectionStrategy for LabelAnchored {
    fn select(&self, candidates: &[AmountCandidate]) -> Option<Decimal> {
        let labeled = candidates
            .iter()
            .filter(|c| {
                let line = c.line.to_lowercase();
                self.labels.iter().any(|l| line.contains(l.as_str()))
            })
            .map(|c| c.value)
            .max();

        labeled.or_else(|| MaxAmount.select(candidates))
    }
}
