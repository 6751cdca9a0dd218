//! Files client.
//!
//! Multipart upload, file token reset, and deletion against the
//! schmuckliCloud Files API. Every operation acts on behalf of the
//! signed-in user, so a session token must be set first.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::json;

use crate::client::{Connection, RequestDescriptor};
use crate::credentials::AppCredentials;
use crate::error::{Error, Result};
use crate::result::ApiResult;
use crate::types::UploadFile;

/// Default Files API base URL.
pub const DEFAULT_SERVICE_URL: &str = "https://api.schmuckli.cloud/client_api/v1/files/";

/// Client for the schmuckliCloud Files API.
#[derive(Debug, Clone)]
pub struct FilesClient {
    connection: Connection,
    auth_token: Option<String>,
}

impl FilesClient {
    /// Create a client against the default service URL.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Result<Self> {
        Self::with_service_url(app_id, app_secret, DEFAULT_SERVICE_URL)
    }

    /// Create a client against a custom service URL.
    pub fn with_service_url(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        service_url: impl Into<String>,
    ) -> Result<Self> {
        Self::from_credentials(AppCredentials::new(app_id, app_secret), service_url)
    }

    /// Create a client from resolved credentials.
    pub fn from_credentials(
        credentials: AppCredentials,
        service_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            connection: Connection::new(service_url, credentials)?,
            auth_token: None,
        })
    }

    /// The service URL this client targets.
    pub fn service_url(&self) -> &str {
        self.connection.base_url()
    }

    /// Set the session token of the signed-in user.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    /// Upload the given files. The result body carries the token and
    /// location per file.
    ///
    /// Parts are appended under positional field names (`file_0`,
    /// `file_1`, ...). Rejects before any request when the list is empty
    /// or no session token is set.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<ApiResult> {
        if files.is_empty() {
            return Err(Error::invalid_argument("Please provide at least one file."));
        }
        let token = self.require_auth_token()?;

        let mut form = Form::new();
        for (index, file) in files.into_iter().enumerate() {
            let mut part = Part::bytes(file.content).file_name(file.file_name);
            if let Some(content_type) = file.content_type {
                part = part.mime_str(&content_type).map_err(|e| {
                    Error::invalid_argument(format!(
                        "Invalid content type '{}': {}",
                        content_type, e
                    ))
                })?;
            }
            form = form.part(format!("file_{}", index), part);
        }

        let descriptor = RequestDescriptor::new(Method::POST, "")
            .auth_token(Some(token))
            .multipart(form);
        self.connection.execute(descriptor).await
    }

    /// Replace the active access token of a file with a new one. The
    /// result body carries the new token.
    pub async fn reset_token(&self, filename: &str) -> Result<ApiResult> {
        validate_filename(filename)?;
        let token = self.require_auth_token()?;

        let descriptor = RequestDescriptor::new(Method::PUT, "")
            .auth_token(Some(token))
            .json(json!({
                "function": "reset_token",
                "filename": filename,
            }));
        self.connection.execute(descriptor).await
    }

    /// Delete the file with the given name.
    pub async fn delete(&self, filename: &str) -> Result<ApiResult> {
        validate_filename(filename)?;
        let token = self.require_auth_token()?;

        let descriptor = RequestDescriptor::new(Method::DELETE, "")
            .auth_token(Some(token))
            .json(json!({
                "filename": filename,
            }));
        self.connection.execute(descriptor).await
    }

    fn require_auth_token(&self) -> Result<&str> {
        self.auth_token.as_deref().ok_or(Error::MissingAuthToken)
    }
}

fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty() {
        return Err(Error::invalid_argument("Please provide a valid filename."));
    }
    Ok(())
}
