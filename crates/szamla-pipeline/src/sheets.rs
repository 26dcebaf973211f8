//! Spreadsheet sink: invoice rows and the audit log.

use tracing::{debug, warn};

use szamla_core::ExtractedRecord;

use crate::error::SheetsError;
use crate::google::GoogleAuth;

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Invoice rows land on the first sheet.
const INVOICE_RANGE: &str = "A:J";

/// Audit lines land on the Log sheet.
const LOG_RANGE: &str = "Log!A:D";

/// Receives invoice rows and audit log lines.
#[allow(async_fn_in_trait)]
pub trait RecordSink {
    /// Append one invoice row.
    async fn append_invoice(&self, record: &ExtractedRecord) -> Result<(), SheetsError>;

    /// Append one audit log line.
    async fn append_log(&self, level: &str, message: &str, context: &str)
        -> Result<(), SheetsError>;
}

/// Google Sheets sink. Without a configured sheet id every append is a
/// silent no-op, not an error.
pub struct GoogleSheetsSink {
    client: reqwest::Client,
    auth: Option<GoogleAuth>,
    sheet_id: Option<String>,
}

impl GoogleSheetsSink {
    pub fn new(client: reqwest::Client, auth: Option<GoogleAuth>, sheet_id: Option<String>) -> Self {
        if sheet_id.is_none() {
            warn!("no sheet id configured; spreadsheet logging disabled");
        }
        Self {
            client,
            auth,
            sheet_id,
        }
    }

    async fn append_row(&self, range: &str, values: Vec<String>) -> Result<(), SheetsError> {
        let (Some(auth), Some(sheet_id)) = (&self.auth, &self.sheet_id) else {
            return Ok(());
        };

        let token = auth.access_token(&[SHEETS_SCOPE]).await?;
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}:append?valueInputOption=USER_ENTERED",
            sheet_id,
            urlencoding::encode(range)
        );

        let body = serde_json::json!({ "values": [values] });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Rejected { status, body });
        }

        debug!("appended row to {}", range);
        Ok(())
    }
}

/// Spreadsheet column order for one invoice:
/// document type, serial number, vendor, vendor tax id, issue date,
/// due date, gross amount, comment, buyer, file URL.
pub fn invoice_row(record: &ExtractedRecord) -> Vec<String> {
    vec![
        record.document_type.label().to_string(),
        record.invoice_number.clone().unwrap_or_default(),
        record.vendor_name.clone().unwrap_or_default(),
        record.vendor_tax_id.clone().unwrap_or_default(),
        record.issue_date.clone().unwrap_or_default(),
        record.due_date.clone().unwrap_or_default(),
        record.amount.map(|a| a.to_string()).unwrap_or_default(),
        record.comment.clone().unwrap_or_default(),
        record.buyer_name.clone().unwrap_or_default(),
        record.file_url.clone().unwrap_or_default(),
    ]
}

impl RecordSink for GoogleSheetsSink {
    async fn append_invoice(&self, record: &ExtractedRecord) -> Result<(), SheetsError> {
        self.append_row(INVOICE_RANGE, invoice_row(record)).await
    }

    async fn append_log(
        &self,
        level: &str,
        message: &str,
        context: &str,
    ) -> Result<(), SheetsError> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.append_row(
            LOG_RANGE,
            vec![
                timestamp,
                level.to_string(),
                message.to_string(),
                context.to_string(),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use szamla_core::DocumentType;

    use super::*;

    #[test]
    fn test_invoice_row_order() {
        let record = ExtractedRecord {
            document_type: DocumentType::PaymentRequest,
            invoice_number: Some("2024/7".to_string()),
            vendor_name: Some("Acme Kft.".to_string()),
            vendor_tax_id: Some("12345676-2-41".to_string()),
            issue_date: Some("2024. 01. 15.".to_string()),
            due_date: Some("2024. 01. 30.".to_string()),
            amount: Some(Decimal::from_str("25400").unwrap()),
            buyer_name: Some("Teszt Zrt.".to_string()),
            comment: Some("átutalás".to_string()),
            file_url: Some("https://drive.example/x".to_string()),
        };

        let row = invoice_row(&record);
        assert_eq!(
            row,
            vec![
                "Díjbekérő",
                "2024/7",
                "Acme Kft.",
                "12345676-2-41",
                "2024. 01. 15.",
                "2024. 01. 30.",
                "25400",
                "átutalás",
                "Teszt Zrt.",
                "https://drive.example/x",
            ]
        );
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let row = invoice_row(&ExtractedRecord::default());
        assert_eq!(row[0], "Számla");
        assert!(row[1..].iter().all(|cell| cell.is_empty()));
    }
}
