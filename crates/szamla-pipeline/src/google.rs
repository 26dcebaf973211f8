//! Service-account access tokens for the Google APIs.

use std::path::Path;

use yup_oauth2::ServiceAccountKey;

use crate::error::GoogleError;

/// Token source backed by a Google service account key.
#[derive(Clone)]
pub struct GoogleAuth {
    key: ServiceAccountKey,
}

impl GoogleAuth {
    /// Read the service account key from disk.
    pub async fn from_file(path: &Path) -> Result<Self, GoogleError> {
        let key = yup_oauth2::read_service_account_key(path)
            .await
            .map_err(|e| GoogleError::Key(e.to_string()))?;
        Ok(Self { key })
    }

    /// Fetch an access token for the given scopes.
    pub async fn access_token(&self, scopes: &[&str]) -> Result<String, GoogleError> {
        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(self.key.clone())
            .build()
            .await
            .map_err(|e| GoogleError::Auth(e.to_string()))?;

        let token = auth
            .token(scopes)
            .await
            .map_err(|e| GoogleError::Auth(e.to_string()))?;

        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| GoogleError::Auth("token response carried no access token".to_string()))
    }
}
