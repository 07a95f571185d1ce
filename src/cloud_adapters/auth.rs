//! Credential flow for the Google Sheets adapter.

use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod};

const SPREADSHEET_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Build the authenticator used by the adapter, reusing tokens persisted at
/// `token_path` when present.
pub async fn sheets_authenticator(
    credentials_path: &str,
    token_path: &str,
) -> Result<DefaultAuthenticator, Box<dyn std::error::Error>> {
    if !std::path::Path::new(credentials_path).exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "credentials json file was not found",
        )
        .into());
    }
    let secret = yup_oauth2::read_application_secret(credentials_path)
        .await
        .map_err(|e| {
            Box::new(std::io::Error::other(e.to_string())) as Box<dyn std::error::Error>
        })?;
    let auth = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::Interactive)
        .persist_tokens_to_disk(token_path)
        .build()
        .await?;
    Ok(auth)
}

/// Perform the OAuth installed flow once and persist tokens to disk.
pub async fn initial_oauth_login(
    credentials_path: &str,
    token_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let auth = sheets_authenticator(credentials_path, token_path).await?;
    let _ = auth.token(&[SPREADSHEET_SCOPE]).await?;
    Ok(())
}
