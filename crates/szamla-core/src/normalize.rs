//! Text normalization: per-page text into a single searchable blob.

/// Join per-page text into one string, pages in original order separated by
/// a newline. Pages without a text layer contribute empty entries; a
/// document with no text at all yields the empty string.
pub fn normalize_pages(pages: &[Option<String>]) -> String {
    let all_empty = pages
        .iter()
        .all(|p| p.as_deref().is_none_or(|t| t.trim().is_empty()));
    if all_empty {
        return String::new();
    }

    pages
        .iter()
        .map(|p| p.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_joined_in_order() {
        let pages = vec![Some("first".to_string()), Some("second".to_string())];
        assert_eq!(normalize_pages(&pages), "first\nsecond");
    }

    #[test]
    fn test_missing_page_keeps_position() {
        let pages = vec![Some("first".to_string()), None, Some("third".to_string())];
        assert_eq!(normalize_pages(&pages), "first\n\nthird");
    }

    #[test]
    fn test_no_text_layer_yields_empty_string() {
        assert_eq!(normalize_pages(&[]), "");
        assert_eq!(normalize_pages(&[None, None]), "");
        assert_eq!(normalize_pages(&[Some(String::new()), None]), "");
    }
}
