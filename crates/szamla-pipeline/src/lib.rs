//! Collaborators around the szamla extraction core.
//!
//! This crate provides:
//! - IMAP mail intake (unread invoice mails, PDF attachments, HTML bodies)
//! - Invoice link discovery and download
//! - Google Drive upload and Google Sheets rows + audit log
//! - SMTP error alerting
//! - The orchestrator tying them together with per-mail failure isolation

pub mod alert;
pub mod config;
pub mod error;
pub mod google;
pub mod links;
pub mod mail;
pub mod pipeline;
pub mod sheets;
pub mod storage;

pub use alert::{Alerter, SmtpAlerter};
pub use config::{AmountStrategyKind, PipelineConfig};
pub use error::{
    AlertError, FetchError, GoogleError, MailError, PipelineError, SheetsError, StorageError,
};
pub use google::GoogleAuth;
pub use links::{fetch_pdf, find_invoice_links, FetchedPdf};
pub use mail::{ImapMailSource, InvoiceMail, MailAttachment, MailSource};
pub use pipeline::{within_working_hours, Pipeline, RunSummary};
pub use sheets::{GoogleSheetsSink, RecordSink};
pub use storage::{GoogleDriveUploader, StorageUploader};
