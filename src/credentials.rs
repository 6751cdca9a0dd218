//! App credential resolution.
//!
//! Credentials are resolved in order:
//! 1. Explicit arguments
//! 2. Environment variables (SCHMUCKLICLOUD_APP_ID, SCHMUCKLICLOUD_APP_SECRET)
//! 3. Credentials file (~/.schmucklicloud/credentials.json)

use serde::Deserialize;
use std::path::PathBuf;
use tokio::fs;

use crate::error::{Error, Result};

/// App identity attached to every outbound request.
///
/// Immutable after construction; session-scoped state (auth token, dataset,
/// bucket) lives on the domain clients instead.
#[derive(Debug, Clone)]
pub struct AppCredentials {
    /// APP ID created for a client app in the schmuckliCloud console.
    pub app_id: String,
    /// APP Secret created alongside the APP ID.
    pub app_secret: String,
}

impl AppCredentials {
    /// Create credentials from explicit values.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }
}

/// Credentials file structure.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(rename = "appId")]
    app_id: Option<String>,
    #[serde(rename = "appSecret")]
    app_secret: Option<String>,
}

/// Get the path to the credentials file.
fn credentials_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".schmucklicloud").join("credentials.json"))
}

/// Read the credentials file.
async fn read_credentials_file() -> Option<CredentialsFile> {
    let path = credentials_file_path()?;
    let content = fs::read_to_string(&path).await.ok()?;
    serde_json::from_str(&content).ok()
}

/// Resolve app credentials from arguments, environment, or the credentials
/// file.
///
/// # Errors
///
/// Returns [`Error::CredentialsNotFound`] if either half of the credential
/// pair cannot be resolved from any source.
pub async fn resolve_credentials(
    app_id: Option<&str>,
    app_secret: Option<&str>,
) -> Result<AppCredentials> {
    let mut resolved_id = app_id.map(String::from);
    let mut resolved_secret = app_secret.map(String::from);

    if resolved_id.is_none() {
        resolved_id = std::env::var("SCHMUCKLICLOUD_APP_ID").ok();
    }
    if resolved_secret.is_none() {
        resolved_secret = std::env::var("SCHMUCKLICLOUD_APP_SECRET").ok();
    }

    if resolved_id.is_none() || resolved_secret.is_none() {
        if let Some(file) = read_credentials_file().await {
            if resolved_id.is_none() {
                resolved_id = file.app_id;
            }
            if resolved_secret.is_none() {
                resolved_secret = file.app_secret;
            }
        }
    }

    let app_id = resolved_id.ok_or_else(|| {
        Error::CredentialsNotFound(
            "APP ID is required. Provide it via:\n\
             1. an explicit argument\n\
             2. the SCHMUCKLICLOUD_APP_ID environment variable\n\
             3. ~/.schmucklicloud/credentials.json"
                .to_string(),
        )
    })?;

    let app_secret = resolved_secret.ok_or_else(|| {
        Error::CredentialsNotFound(
            "APP Secret is required. Provide it via:\n\
             1. an explicit argument\n\
             2. the SCHMUCKLICLOUD_APP_SECRET environment variable\n\
             3. ~/.schmucklicloud/credentials.json"
                .to_string(),
        )
    })?;

    Ok(AppCredentials { app_id, app_secret })
}
