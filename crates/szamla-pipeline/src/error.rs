//! Error types for the szamla-pipeline library.

use thiserror::Error;

/// Top-level pipeline error.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Mail intake error.
    #[error("mail error: {0}")]
    Mail(#[from] MailError),

    /// Link download error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Object storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Spreadsheet append error.
    #[error("sheets error: {0}")]
    Sheets(#[from] SheetsError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the IMAP mail source.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("IMAP error: {0}")]
    Imap(#[from] imap::error::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("failed to parse message: {0}")]
    Parse(String),

    #[error("mail task failed: {0}")]
    Join(String),
}

/// Errors while downloading a linked document.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL did not return a PDF: {0}")]
    NotAPdf(String),
}

/// Errors from the Google service-account token source.
#[derive(Error, Debug)]
pub enum GoogleError {
    #[error("failed to read service account key: {0}")]
    Key(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Errors from the storage uploader.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Google(#[from] GoogleError),

    #[error("upload rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Errors from the spreadsheet sink.
#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Google(#[from] GoogleError),

    #[error("append rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Errors from the SMTP alerter. Always swallowed by the caller.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("invalid address: {0}")]
    Address(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
