//! Date token extraction with issue/due disambiguation.
//!
//! Dates are returned as the matched strings, not parsed into a date type:
//! the source formats are ambiguous across locales, so downstream consumers
//! re-parse as needed.

use crate::models::locale::LocaleProfile;

/// How many characters before a date token are searched for a label.
const LABEL_WINDOW: usize = 60;

/// Date tokens recovered from invoice text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDates {
    /// Issue date; falls back to the first unlabeled date token.
    pub issue_date: Option<String>,
    /// Due date; only filled from an explicitly labeled token.
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DateLabel {
    Issue,
    Due,
    None,
}

/// Extract issue and due date tokens from the text.
///
/// The locale's date shapes are tried in priority order; within a shape,
/// matches are taken in text order. Each match is classified by the label
/// tokens in a bounded window before it.
pub fn extract_dates(text: &str, locale: &LocaleProfile) -> ExtractedDates {
    let mut issue = None;
    let mut due = None;
    let mut first_unlabeled = None;

    for pattern in locale.date_patterns() {
        for found in pattern.find_iter(text) {
            let token = found.as_str().trim().to_string();
            match classify(text, found.start(), locale) {
                DateLabel::Issue if issue.is_none() => issue = Some(token),
                DateLabel::Due if due.is_none() => due = Some(token),
                DateLabel::None if first_unlabeled.is_none() => first_unlabeled = Some(token),
                _ => {}
            }
        }
    }

    ExtractedDates {
        issue_date: issue.or(first_unlabeled),
        due_date: due,
    }
}

fn classify(text: &str, pos: usize, locale: &LocaleProfile) -> DateLabel {
    let window = window_before(text, pos, LABEL_WINDOW).to_lowercase();

    // Due labels first: "fizetési határidő" must not be claimed by the
    // shorter issue tokens.
    if locale.due_date_labels().iter().any(|l| window.contains(l)) {
        return DateLabel::Due;
    }
    if locale.issue_date_labels().iter().any(|l| window.contains(l)) {
        return DateLabel::Issue;
    }
    DateLabel::None
}

/// The last `chars` characters before `pos`, respecting char boundaries.
fn window_before(text: &str, pos: usize, chars: usize) -> &str {
    let head = &text[..pos];
    let start = head
        .char_indices()
        .rev()
        .nth(chars.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    &head[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hungarian() -> LocaleProfile {
        LocaleProfile::hungarian()
    }

    #[test]
    fn test_long_form_date_returned_verbatim() {
        let dates = extract_dates("Kiállítás dátuma: 2023. 10. 25.", &hungarian());
        assert_eq!(dates.issue_date.as_deref(), Some("2023. 10. 25."));
    }

    #[test]
    fn test_iso_date() {
        let dates = extract_dates("kelt: 2023-10-25", &hungarian());
        assert_eq!(dates.issue_date.as_deref(), Some("2023-10-25"));
    }

    #[test]
    fn test_slash_date_exact_substring() {
        let dates = extract_dates("25/10/2023", &hungarian());
        assert_eq!(dates.issue_date.as_deref(), Some("25/10/2023"));
        assert_eq!(dates.due_date, None);
    }

    #[test]
    fn test_issue_and_due_split_by_labels() {
        let text = "Számla kelte: 2023. 10. 25.\nFizetési határidő: 2023. 11. 08.";
        let dates = extract_dates(text, &hungarian());
        assert_eq!(dates.issue_date.as_deref(), Some("2023. 10. 25."));
        assert_eq!(dates.due_date.as_deref(), Some("2023. 11. 08."));
    }

    #[test]
    fn test_unlabeled_date_falls_back_to_issue() {
        let dates = extract_dates("valami 2023. 10. 25. valami", &hungarian());
        assert_eq!(dates.issue_date.as_deref(), Some("2023. 10. 25."));
        assert_eq!(dates.due_date, None);
    }

    #[test]
    fn test_no_date_yields_none() {
        let dates = extract_dates("no dates in here", &hungarian());
        assert_eq!(dates, ExtractedDates::default());
    }

    #[test]
    fn test_long_form_outranks_slash_form() {
        // Both shapes present: the regional long form wins regardless of
        // position in the text.
        let text = "01/02/2023 valamint 2023. 10. 25.";
        let dates = extract_dates(text, &hungarian());
        assert_eq!(dates.issue_date.as_deref(), Some("2023. 10. 25."));
    }
}
