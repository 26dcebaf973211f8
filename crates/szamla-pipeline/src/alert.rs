//! Out-of-band error alerts over SMTP.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::error::AlertError;

/// Best-effort error notification. Delivery failures are swallowed; the
/// pipeline must keep running without its alert channel.
#[allow(async_fn_in_trait)]
pub trait Alerter {
    async fn send_error_alert(&self, subject: &str, detail: &str, context: &str);
}

/// SMTP (STARTTLS) alerter reusing the mail account credentials.
#[derive(Debug, Clone)]
pub struct SmtpAlerter {
    config: MailConfig,
    recipient: Option<String>,
}

impl SmtpAlerter {
    pub fn new(config: MailConfig, recipient: Option<String>) -> Self {
        if recipient.is_none() {
            warn!("no alert recipient configured; error alerts disabled");
        }
        Self { config, recipient }
    }
}

impl Alerter for SmtpAlerter {
    async fn send_error_alert(&self, subject: &str, detail: &str, context: &str) {
        let Some(recipient) = self.recipient.clone() else {
            return;
        };

        let config = self.config.clone();
        let subject = format!("Invoice automation error: {}", subject);
        let body = format!(
            "<h2>Invoice processing error</h2>\n\
             <p><strong>Context:</strong> {}</p>\n\
             <p><strong>Error details:</strong></p>\n\
             <pre>{}</pre>\n\
             <p>Please check the system logs for more information.</p>",
            context, detail
        );

        let result =
            tokio::task::spawn_blocking(move || send_blocking(&config, &recipient, &subject, &body))
                .await;

        match result {
            Ok(Ok(())) => info!("error alert sent"),
            Ok(Err(e)) => warn!("failed to send error alert: {}", e),
            Err(e) => warn!("alert task failed: {}", e),
        }
    }
}

fn send_blocking(
    config: &MailConfig,
    recipient: &str,
    subject: &str,
    body: &str,
) -> Result<(), AlertError> {
    let message = Message::builder()
        .from(config
            .user
            .parse()
            .map_err(|e| AlertError::Address(format!("{}: {}", config.user, e)))?)
        .to(recipient
            .parse()
            .map_err(|e| AlertError::Address(format!("{}: {}", recipient, e)))?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(body.to_string())
        .map_err(|e| AlertError::Build(e.to_string()))?;

    let mailer = SmtpTransport::starttls_relay(&config.host)
        .map_err(|e| AlertError::Smtp(e.to_string()))?
        .port(config.smtp_port)
        .credentials(Credentials::new(
            config.user.clone(),
            config.password.clone(),
        ))
        .build();

    mailer
        .send(&message)
        .map_err(|e| AlertError::Smtp(e.to_string()))?;

    Ok(())
}
