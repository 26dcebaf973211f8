//! The orchestrator: mail in, records out, failures isolated per mail.

use tracing::{debug, error, info, warn};

use szamla_core::{ExtractedRecord, RecordExtractor};

use crate::alert::{Alerter, SmtpAlerter};
use crate::config::{PipelineConfig, ScheduleConfig};
use crate::error::PipelineError;
use crate::google::GoogleAuth;
use crate::links::{fetch_pdf, find_invoice_links};
use crate::mail::{ImapMailSource, InvoiceMail, MailSource};
use crate::sheets::{GoogleSheetsSink, RecordSink};
use crate::storage::{GoogleDriveUploader, StorageUploader};

/// Outcome counters for one polling cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Invoice mails seen this cycle.
    pub mails_seen: usize,
    /// Documents uploaded and appended.
    pub documents_processed: usize,
    /// Mails that failed and were alerted.
    pub failures: usize,
}

/// Wires the collaborators around the extraction core.
///
/// One bad mail never aborts the cycle: its error is logged to the audit
/// sheet and alerted, and the remaining mails are still processed.
pub struct Pipeline<M, U, S, A> {
    mail: M,
    storage: U,
    sink: S,
    alerter: A,
    extractor: RecordExtractor,
    http: reqwest::Client,
}

impl<M, U, S, A> Pipeline<M, U, S, A>
where
    M: MailSource,
    U: StorageUploader,
    S: RecordSink,
    A: Alerter,
{
    pub fn new(mail: M, storage: U, sink: S, alerter: A, extractor: RecordExtractor) -> Self {
        Self {
            mail,
            storage,
            sink,
            alerter,
            extractor,
            http: reqwest::Client::new(),
        }
    }

    /// Run one polling cycle: fetch, process each mail, mark handled mails
    /// seen.
    pub async fn run_once(&self) -> Result<RunSummary, PipelineError> {
        let mails = self.mail.fetch_invoices().await?;
        let mut summary = RunSummary::default();

        if mails.is_empty() {
            info!("no new invoices");
            return Ok(summary);
        }

        for mail in &mails {
            summary.mails_seen += 1;
            info!("processing mail: {}", mail.subject);

            if let Err(e) = self
                .sink
                .append_log(
                    "INFO",
                    &format!("Processing email: {}", mail.subject),
                    "email",
                )
                .await
            {
                warn!("audit log append failed: {}", e);
            }

            match self.process_mail(mail).await {
                Ok(0) => {
                    // No PDF anywhere: leave the mail unread for a later look.
                    debug!("no PDF found (attachment or link) in: {}", mail.subject);
                }
                Ok(count) => {
                    summary.documents_processed += count;
                    if let Err(e) = self.mail.mark_seen(mail.uid).await {
                        warn!("failed to mark mail {} seen: {}", mail.uid, e);
                    }
                    info!("finished processing mail: {}", mail.subject);
                }
                Err(e) => {
                    summary.failures += 1;
                    let message = format!("Error processing email '{}': {}", mail.subject, e);
                    error!("{}", message);

                    if let Err(log_err) = self.sink.append_log("ERROR", &message, "email").await {
                        warn!("audit log append failed: {}", log_err);
                    }
                    self.alerter
                        .send_error_alert(&mail.subject, &message, "email")
                        .await;
                }
            }
        }

        Ok(summary)
    }

    /// Process every PDF of one mail; returns how many documents went
    /// through.
    async fn process_mail(&self, mail: &InvoiceMail) -> Result<usize, PipelineError> {
        let mut documents: Vec<(String, Vec<u8>)> = mail
            .attachments
            .iter()
            .map(|a| (a.filename.clone(), a.data.clone()))
            .collect();

        // No attachments: follow the first invoice link in the HTML body.
        if documents.is_empty() {
            if let Some(html) = &mail.html_body {
                if let Some(url) = find_invoice_links(html).first() {
                    info!("following invoice link: {}", url);
                    match fetch_pdf(&self.http, url).await {
                        Ok(fetched) => documents.push((fetched.filename, fetched.data)),
                        Err(e) => warn!("failed to download from link {}: {}", url, e),
                    }
                }
            }
        }

        let mut processed = 0;
        for (filename, data) in &documents {
            self.process_document(filename, data).await?;
            processed += 1;
        }
        Ok(processed)
    }

    async fn process_document(&self, filename: &str, data: &[u8]) -> Result<(), PipelineError> {
        let file_url = self.storage.upload(filename, data).await?;

        let mut record = match self.extractor.extract_from_pdf(data) {
            Ok(record) => record,
            Err(e) => {
                // Unreadable document: the row still goes out, with defaults.
                warn!("no data available from {}: {}", filename, e);
                ExtractedRecord::default()
            }
        };
        record.file_url = Some(file_url);

        self.sink.append_invoice(&record).await?;

        let message = format!(
            "Successfully processed invoice: {} - {}",
            record.vendor_name.as_deref().unwrap_or(""),
            record
                .amount
                .map(|a| a.to_string())
                .unwrap_or_default(),
        );
        if let Err(e) = self.sink.append_log("INFO", &message, "invoice").await {
            warn!("audit log append failed: {}", e);
        }
        Ok(())
    }
}

impl Pipeline<ImapMailSource, GoogleDriveUploader, GoogleSheetsSink, SmtpAlerter> {
    /// Build the production pipeline described by the configuration.
    pub async fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let http = reqwest::Client::new();

        let auth = match &config.google.service_account_file {
            Some(path) => Some(
                GoogleAuth::from_file(path)
                    .await
                    .map_err(|e| PipelineError::Config(e.to_string()))?,
            ),
            None => None,
        };

        let drive_auth = auth.clone().ok_or_else(|| {
            PipelineError::Config("google.service_account_file is not configured".into())
        })?;
        let folder_id = config.google.drive_folder_id.clone().ok_or_else(|| {
            PipelineError::Config("google.drive_folder_id is not configured".into())
        })?;

        let storage = GoogleDriveUploader::new(http.clone(), drive_auth, folder_id);
        let sink = GoogleSheetsSink::new(http.clone(), auth, config.google.sheet_id.clone());
        let alerter = SmtpAlerter::new(config.mail.clone(), config.alert.recipient.clone());
        let mail = ImapMailSource::new(config.mail.clone());

        Ok(Self::new(mail, storage, sink, alerter, config.extractor()))
    }
}

/// True when `hour` (local) falls inside the configured working window.
pub fn within_working_hours(hour: u32, schedule: &ScheduleConfig) -> bool {
    (schedule.start_hour..=schedule.end_hour).contains(&hour)
}
