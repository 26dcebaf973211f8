//! IMAP mail source: unread invoice mails and their PDF attachments.

use mailparse::{MailHeaderMap, ParsedMail};
use tracing::{debug, info};

use crate::config::MailConfig;
use crate::error::MailError;

/// Subject keywords that mark a message as invoice-related.
const SUBJECT_KEYWORDS: &[&str] = &["invoice", "számla", "díjbekérő"];

/// A PDF attachment pulled out of a mail message.
#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// One candidate invoice mail.
#[derive(Debug, Clone)]
pub struct InvoiceMail {
    /// IMAP UID, used to mark the message seen after processing.
    pub uid: u32,
    pub subject: String,
    pub html_body: Option<String>,
    pub attachments: Vec<MailAttachment>,
}

/// Source of candidate invoice mails.
#[allow(async_fn_in_trait)]
pub trait MailSource {
    /// Fetch unread invoice mails without marking them seen.
    async fn fetch_invoices(&self) -> Result<Vec<InvoiceMail>, MailError>;

    /// Mark a message as seen.
    async fn mark_seen(&self, uid: u32) -> Result<(), MailError>;
}

/// IMAP-over-TLS mail source. Connects per call, like the rest of the
/// pipeline it runs at most once per polling interval.
#[derive(Debug, Clone)]
pub struct ImapMailSource {
    config: MailConfig,
}

impl ImapMailSource {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

impl MailSource for ImapMailSource {
    async fn fetch_invoices(&self) -> Result<Vec<InvoiceMail>, MailError> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || fetch_blocking(&config))
            .await
            .map_err(|e| MailError::Join(e.to_string()))?
    }

    async fn mark_seen(&self, uid: u32) -> Result<(), MailError> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || mark_seen_blocking(&config, uid))
            .await
            .map_err(|e| MailError::Join(e.to_string()))?
    }
}

type ImapSession = imap::Session<native_tls::TlsStream<std::net::TcpStream>>;

fn connect(config: &MailConfig) -> Result<ImapSession, MailError> {
    let tls = native_tls::TlsConnector::builder().build()?;
    let client = imap::connect((config.host.as_str(), config.imap_port), &config.host, &tls)?;
    let mut session = client
        .login(&config.user, &config.password)
        .map_err(|e| e.0)?;
    session.select(&config.folder)?;
    Ok(session)
}

fn fetch_blocking(config: &MailConfig) -> Result<Vec<InvoiceMail>, MailError> {
    let mut session = connect(config)?;

    // Server-side UNSEEN only; subject keywords are matched client-side so
    // non-ASCII terms need no IMAP SEARCH literals.
    let uids = session.uid_search("UNSEEN")?;
    debug!("{} unseen messages in {}", uids.len(), config.folder);

    let mut mails = Vec::new();
    for uid in uids {
        let fetches = session.uid_fetch(uid.to_string(), "RFC822")?;
        let Some(fetch) = fetches.iter().next() else {
            continue;
        };
        let Some(raw) = fetch.body() else {
            continue;
        };

        let parsed = mailparse::parse_mail(raw).map_err(|e| MailError::Parse(e.to_string()))?;
        let subject = parsed
            .headers
            .get_first_value("Subject")
            .unwrap_or_default();

        if !subject_matches(&subject) {
            continue;
        }

        let mut attachments = Vec::new();
        let mut html_body = None;
        collect_parts(&parsed, &mut attachments, &mut html_body)?;

        info!(
            "invoice mail {:?} ({} PDF attachments)",
            subject,
            attachments.len()
        );
        mails.push(InvoiceMail {
            uid,
            subject,
            html_body,
            attachments,
        });
    }

    session.logout().ok();
    Ok(mails)
}

fn mark_seen_blocking(config: &MailConfig, uid: u32) -> Result<(), MailError> {
    let mut session = connect(config)?;
    session.uid_store(uid.to_string(), "+FLAGS (\\Seen)")?;
    session.logout().ok();
    Ok(())
}

fn subject_matches(subject: &str) -> bool {
    let subject = subject.to_lowercase();
    SUBJECT_KEYWORDS.iter().any(|kw| subject.contains(kw))
}

/// Walk the MIME tree collecting PDF attachments and the first HTML body.
fn collect_parts(
    part: &ParsedMail<'_>,
    attachments: &mut Vec<MailAttachment>,
    html_body: &mut Option<String>,
) -> Result<(), MailError> {
    let disposition = part.get_content_disposition();

    if let Some(name) = disposition.params.get("filename") {
        if name.to_lowercase().ends_with(".pdf") {
            let data = part
                .get_body_raw()
                .map_err(|e| MailError::Parse(e.to_string()))?;
            debug!("PDF attachment {} ({} bytes)", name, data.len());
            attachments.push(MailAttachment {
                filename: name.clone(),
                data,
            });
            return Ok(());
        }
    }

    if html_body.is_none() && part.ctype.mimetype.eq_ignore_ascii_case("text/html") {
        *html_body = Some(part.get_body().map_err(|e| MailError::Parse(e.to_string()))?);
    }

    for sub in &part.subparts {
        collect_parts(sub, attachments, html_body)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_matching() {
        assert!(subject_matches("Invoice #42"));
        assert!(subject_matches("Új számla érkezett"));
        assert!(subject_matches("DÍJBEKÉRŐ - Acme"));
        assert!(!subject_matches("Weekly newsletter"));
    }

    #[test]
    fn test_collect_parts_from_multipart_mail() {
        let raw = concat!(
            "Subject: Szamla\r\n",
            "MIME-Version: 1.0\r\n",
            "Content-Type: multipart/mixed; boundary=\"sep\"\r\n",
            "\r\n",
            "--sep\r\n",
            "Content-Type: text/html; charset=utf-8\r\n",
            "\r\n",
            "<a href=\"https://example.com/x\">számla</a>\r\n",
            "--sep\r\n",
            "Content-Type: application/pdf\r\n",
            "Content-Disposition: attachment; filename=\"szamla.pdf\"\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "\r\n",
            "JVBERi0xLjQ=\r\n",
            "--sep--\r\n",
        );

        let parsed = mailparse::parse_mail(raw.as_bytes()).unwrap();
        let mut attachments = Vec::new();
        let mut html_body = None;
        collect_parts(&parsed, &mut attachments, &mut html_body).unwrap();

        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].filename, "szamla.pdf");
        assert_eq!(attachments[0].data, b"%PDF-1.4");
        assert!(html_body.unwrap().contains("számla"));
    }

    #[test]
    fn test_non_pdf_attachments_ignored() {
        let raw = concat!(
            "Subject: Invoice\r\n",
            "Content-Type: application/octet-stream\r\n",
            "Content-Disposition: attachment; filename=\"notes.txt\"\r\n",
            "\r\n",
            "hello\r\n",
        );

        let parsed = mailparse::parse_mail(raw.as_bytes()).unwrap();
        let mut attachments = Vec::new();
        let mut html_body = None;
        collect_parts(&parsed, &mut attachments, &mut html_body).unwrap();

        assert!(attachments.is_empty());
    }
}
