//! Object storage: Google Drive upload.

use serde::Deserialize;
use tracing::info;

use crate::error::StorageError;
use crate::google::GoogleAuth;

const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
const UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id,webViewLink";

/// Uploads a document and returns its shareable URL.
#[allow(async_fn_in_trait)]
pub trait StorageUploader {
    async fn upload(&self, filename: &str, data: &[u8]) -> Result<String, StorageError>;
}

/// Google Drive uploader: multipart upload into a fixed folder, returning
/// the file's `webViewLink`.
pub struct GoogleDriveUploader {
    client: reqwest::Client,
    auth: GoogleAuth,
    folder_id: String,
}

impl GoogleDriveUploader {
    pub fn new(client: reqwest::Client, auth: GoogleAuth, folder_id: String) -> Self {
        Self {
            client,
            auth,
            folder_id,
        }
    }
}

#[derive(Deserialize)]
struct UploadedFile {
    id: String,
    #[serde(rename = "webViewLink")]
    web_view_link: String,
}

impl StorageUploader for GoogleDriveUploader {
    async fn upload(&self, filename: &str, data: &[u8]) -> Result<String, StorageError> {
        let token = self.auth.access_token(&[DRIVE_SCOPE]).await?;

        let metadata = serde_json::json!({
            "name": filename,
            "parents": [self.folder_id],
        });

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")?,
            )
            .part(
                "file",
                reqwest::multipart::Part::bytes(data.to_vec())
                    .file_name(filename.to_string())
                    .mime_str("application/pdf")?,
            );

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected { status, body });
        }

        let file: UploadedFile = response.json().await?;
        info!("uploaded {} (id: {})", filename, file.id);
        Ok(file.web_view_link)
    }
}
