//! Messaging client.
//!
//! Push notification dispatch through the schmuckliCloud Messaging API,
//! which relays to Firebase Cloud Messaging. Device tokens are assigned
//! to user ids from the Auth API; sends address users, not devices.

use reqwest::Method;
use serde_json::{json, Value};

use crate::client::{Connection, RequestDescriptor};
use crate::credentials::AppCredentials;
use crate::error::{Error, Result};
use crate::result::ApiResult;

/// Default Messaging API base URL.
pub const DEFAULT_SERVICE_URL: &str = "https://api.schmuckli.cloud/client_api/v1/messaging/";

/// Client for the schmuckliCloud Messaging API.
#[derive(Debug, Clone)]
pub struct MessagingClient {
    connection: Connection,
    auth_token: Option<String>,
}

impl MessagingClient {
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

    /// Assign a Firebase Cloud Messaging device token to a user of the
    /// project.
    pub async fn assign_token_to_user(
        &self,
        device_token: &str,
        user_id: u64,
    ) -> Result<ApiResult> {
        if device_token.is_empty() {
            return Err(Error::invalid_argument("Please provide a device token."));
        }

        let descriptor = RequestDescriptor::new(Method::POST, "")
            .auth_token(self.auth_token.as_deref())
            .json(json!({
                "function": "assign_token",
                "device_token": device_token,
                "user_id": user_id,
            }));
        self.connection.execute(descriptor).await
    }

    /// Send a notification request to all devices of a user immediately.
    /// `body` follows the FCM HTTP message format.
    pub async fn send_request_now(&self, user_id: u64, body: &Value) -> Result<ApiResult> {
        validate_request_body(body)?;

        let descriptor = RequestDescriptor::new(Method::POST, "")
            .auth_token(self.auth_token.as_deref())
            .json(json!({
                "function": "send_now",
                "user_id": user_id,
                "request": body,
            }));
        self.connection.execute(descriptor).await
    }

    /// Queue a notification request for delivery at the given timestamp
    /// (Unix seconds).
    pub async fn send_request_later(
        &self,
        user_id: u64,
        body: &Value,
        timestamp: i64,
    ) -> Result<ApiResult> {
        validate_request_body(body)?;
        if timestamp <= 0 {
            return Err(Error::invalid_argument(
                "Please provide a positive delivery timestamp.",
            ));
        }

        let descriptor = RequestDescriptor::new(Method::POST, "")
            .auth_token(self.auth_token.as_deref())
            .json(json!({
                "function": "send_later",
                "user_id": user_id,
                "request": body,
                "timestamp": timestamp,
            }));
        self.connection.execute(descriptor).await
    }
}

fn validate_request_body(body: &Value) -> Result<()> {
    match body.as_object() {
        Some(map) if !map.is_empty() => Ok(()),
        _ => Err(Error::invalid_argument(
            "Please provide a notification request object.",
        )),
    }
}
