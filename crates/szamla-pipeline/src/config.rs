//! Pipeline configuration: TOML file with environment-variable overrides.
//!
//! The environment variables carry the same names the deployment already
//! uses (`EMAIL_HOST`, `GOOGLE_SHEET_ID`, ...) and take precedence over the
//! file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use szamla_core::{LabelAnchored, LocaleProfile, RecordExtractor};

use crate::error::PipelineError;

/// Main configuration for the szamla pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// IMAP/SMTP account settings.
    pub mail: MailConfig,

    /// Google Drive and Sheets settings.
    pub google: GoogleConfig,

    /// Error alert settings.
    pub alert: AlertConfig,

    /// Polling schedule.
    pub schedule: ScheduleConfig,

    /// Field extraction settings.
    pub extraction: ExtractionConfig,
}

/// Mail account configuration, shared by the IMAP source and SMTP alerter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// IMAP/SMTP host name.
    pub host: String,

    /// IMAP (TLS) port.
    pub imap_port: u16,

    /// SMTP (STARTTLS) port.
    pub smtp_port: u16,

    /// Account user name.
    pub user: String,

    /// Account password.
    pub password: String,

    /// Mailbox folder to poll.
    pub folder: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            imap_port: 993,
            smtp_port: 587,
            user: String::new(),
            password: String::new(),
            folder: "INBOX".to_string(),
        }
    }
}

/// Google API configuration. Each piece degrades independently: a missing
/// sheet id disables spreadsheet logging without disabling Drive uploads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// Path to the service account key JSON.
    pub service_account_file: Option<PathBuf>,

    /// Drive folder that receives the uploaded PDFs.
    pub drive_folder_id: Option<String>,

    /// Spreadsheet receiving invoice rows and the audit log.
    pub sheet_id: Option<String>,
}

/// Error alert configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Recipient of error alerts; absent disables alerting.
    pub recipient: Option<String>,
}

/// Polling schedule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between inbox checks.
    pub interval_secs: u64,

    /// First hour (local time) of the working window.
    pub start_hour: u32,

    /// Last hour (local time, inclusive) of the working window.
    pub end_hour: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            start_hour: 7,
            end_hour: 19,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Locale tag for the pattern table.
    pub locale: String,

    /// Validate tax id checksums.
    pub validate_tax_id: bool,

    /// Total-selection strategy.
    pub amount_strategy: AmountStrategyKind,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            locale: "hu".to_string(),
            validate_tax_id: true,
            amount_strategy: AmountStrategyKind::Max,
        }
    }
}

/// Which amount-selection strategy the extractor uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountStrategyKind {
    /// Largest currency-tagged figure wins.
    #[default]
    Max,
    /// Prefer amounts on lines carrying a total label.
    LabelAnchored,
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), PipelineError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| PipelineError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = env::var("EMAIL_HOST") {
            self.mail.host = v;
        }
        if let Ok(v) = env::var("EMAIL_PORT") {
            if let Ok(port) = v.parse() {
                self.mail.smtp_port = port;
            }
        }
        if let Ok(v) = env::var("EMAIL_USER") {
            self.mail.user = v;
        }
        if let Ok(v) = env::var("EMAIL_PASSWORD") {
            self.mail.password = v;
        }
        if let Ok(v) = env::var("ALERT_EMAIL") {
            self.alert.recipient = Some(v);
        }
        if let Ok(v) = env::var("GOOGLE_SERVICE_ACCOUNT_FILE") {
            self.google.service_account_file = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("GOOGLE_DRIVE_FOLDER_ID") {
            self.google.drive_folder_id = Some(v);
        }
        if let Ok(v) = env::var("GOOGLE_SHEET_ID") {
            self.google.sheet_id = Some(v);
        }
    }

    /// Build the record extractor described by the extraction section.
    pub fn extractor(&self) -> RecordExtractor {
        let locale =
            LocaleProfile::for_tag(&self.extraction.locale).unwrap_or_else(LocaleProfile::hungarian);

        let extractor = RecordExtractor::new()
            .with_tax_id_validation(self.extraction.validate_tax_id)
            .with_locale(locale.clone());

        match self.extraction.amount_strategy {
            AmountStrategyKind::Max => extractor,
            AmountStrategyKind::LabelAnchored => {
                extractor.with_strategy(Box::new(LabelAnchored::new(&locale)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.mail.imap_port, 993);
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.folder, "INBOX");
        assert_eq!(config.schedule.interval_secs, 3600);
        assert_eq!(config.schedule.start_hour, 7);
        assert_eq!(config.schedule.end_hour, 19);
        assert_eq!(config.extraction.locale, "hu");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let toml = r#"
            [mail]
            host = "imap.example.com"
            user = "billing@example.com"

            [google]
            sheet_id = "sheet-123"

            [extraction]
            amount_strategy = "label_anchored"
        "#;

        let config: PipelineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.mail.host, "imap.example.com");
        assert_eq!(config.mail.imap_port, 993);
        assert_eq!(config.google.sheet_id.as_deref(), Some("sheet-123"));
        assert_eq!(config.google.drive_folder_id, None);
        assert_eq!(
            config.extraction.amount_strategy,
            AmountStrategyKind::LabelAnchored
        );
    }

    #[test]
    fn test_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = PipelineConfig::default();
        config.mail.host = "imap.example.com".to_string();
        config.save(&path).unwrap();

        let loaded = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.mail.host, "imap.example.com");
        assert_eq!(loaded.schedule.interval_secs, 3600);
    }
}
