//! Invoice download links in HTML mail bodies.

use scraper::{Html, Selector};
use tracing::debug;

use crate::error::FetchError;

/// Anchor-text keywords that mark a link as an invoice download.
const LINK_KEYWORDS: &[&str] = &[
    "számla letöltése",
    "számla megtekintése",
    "download invoice",
    "számla",
];

/// Collect hrefs of anchors whose visible text matches a download keyword,
/// in document order.
pub fn find_invoice_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("invalid selector");

    let mut links = Vec::new();
    for anchor in document.select(&selector) {
        let text = anchor.text().collect::<String>().to_lowercase();
        let text = text.trim();

        if LINK_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            if let Some(href) = anchor.value().attr("href") {
                debug!("found potential invoice link: {}", href);
                links.push(href.to_string());
            }
        }
    }
    links
}

/// A PDF downloaded from a link.
#[derive(Debug, Clone)]
pub struct FetchedPdf {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Download a linked document, accepting it only when it is a PDF.
///
/// The filename comes from `content-disposition` when present; otherwise the
/// response must declare `application/pdf` and a name is generated.
pub async fn fetch_pdf(client: &reqwest::Client, url: &str) -> Result<FetchedPdf, FetchError> {
    let response = client.get(url).send().await?.error_for_status()?;

    let disposition_name = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(disposition_filename);

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let mut filename = match disposition_name {
        Some(name) => name,
        None => format!("invoice_download_{}.pdf", chrono::Utc::now().timestamp()),
    };

    if !filename.to_lowercase().ends_with(".pdf") {
        if !content_type.contains("application/pdf") {
            return Err(FetchError::NotAPdf(url.to_string()));
        }
        filename.push_str(".pdf");
    }

    let data = response.bytes().await?.to_vec();
    debug!("downloaded {} ({} bytes) from {}", filename, data.len(), url);
    Ok(FetchedPdf { filename, data })
}

fn disposition_filename(value: &str) -> Option<String> {
    let idx = value.find("filename=")?;
    let rest = &value[idx + "filename=".len()..];
    let name = rest
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches('"');
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_keyworded_anchor() {
        let html = r#"
            <html><body>
            <a href="https://example.com/unsubscribe">Leiratkozás</a>
            <a href="https://billing.example.com/dl/42">Számla letöltése</a>
            </body></html>
        "#;

        let links = find_invoice_links(html);
        assert_eq!(links, vec!["https://billing.example.com/dl/42".to_string()]);
    }

    #[test]
    fn test_keyword_matches_nested_markup() {
        let html = r#"<a href="/x"><b>számla</b> megtekintése</a>"#;
        assert_eq!(find_invoice_links(html), vec!["/x".to_string()]);
    }

    #[test]
    fn test_ignores_unrelated_anchors() {
        let html = r#"<a href="/promo">Akciós ajánlat</a>"#;
        assert!(find_invoice_links(html).is_empty());
    }

    #[test]
    fn test_no_html_links() {
        assert!(find_invoice_links("plain text, no anchors").is_empty());
    }

    #[test]
    fn test_disposition_filename() {
        assert_eq!(
            disposition_filename("attachment; filename=\"szamla.pdf\""),
            Some("szamla.pdf".to_string())
        );
        assert_eq!(
            disposition_filename("attachment; filename=szamla.pdf; size=100"),
            Some("szamla.pdf".to_string())
        );
        assert_eq!(disposition_filename("inline"), None);
    }
}
