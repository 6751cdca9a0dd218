//! Authentication client.
//!
//! Email/password accounts, the two-step authorize challenge, password
//! reset, and session queries against the schmuckliCloud Auth API.

use reqwest::Method;
use serde_json::json;

use crate::client::{Connection, RequestDescriptor};
use crate::credentials::AppCredentials;
use crate::error::{Error, Result};
use crate::result::ApiResult;

/// Default Auth API base URL.
pub const DEFAULT_SERVICE_URL: &str = "https://api.schmuckli.cloud/client_api/v1/auth/";

/// Session-query operations resolve 404 so callers can tell "no such
/// session" apart from a failed call.
const RESOLVE_NOT_FOUND: &[u16] = &[404];

/// Client for the schmuckliCloud Auth API.
#[derive(Debug, Clone)]
pub struct AuthClient {
    connection: Connection,
    auth_token: Option<String>,
}

impl AuthClient {
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

    /// Set the session token for subsequent user-scoped operations.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    /// Register a new user with email and password.
    ///
    /// `language` is a two letter code (ex. de, en) used for the
    /// confirmation mail.
    pub async fn register_email_password(
        &self,
        email: &str,
        password: &str,
        language: &str,
    ) -> Result<ApiResult> {
        validate_email(email)?;
        validate_password(password)?;

        let descriptor = RequestDescriptor::new(Method::POST, "emailpassword.php").json(json!({
            "email": email,
            "password": password,
            "lang": language,
        }));
        self.connection.execute(descriptor).await
    }

    /// Authorize a user with email and password. On success the body
    /// carries the session token; save it somewhere safe on the client.
    ///
    /// When the account has a one-time password configured, the backend
    /// answers with status 300. That surfaces as a resolved [`ApiResult`]
    /// (not an error): prompt the user for the code out of band, then call
    /// again with `otp` set.
    pub async fn authorize_email_password(
        &self,
        email: &str,
        password: &str,
        otp: Option<&str>,
    ) -> Result<ApiResult> {
        validate_email(email)?;
        validate_password(password)?;

        let mut body = json!({
            "email": email,
            "password": password,
        });
        if let Some(code) = otp {
            body["otp"] = json!(code);
        }

        let descriptor = RequestDescriptor::new(Method::PUT, "emailpassword.php")
            .json(body)
            .resolve_also(&[300]);
        self.connection.execute(descriptor).await
    }

    /// Send a password reset mail to the given account.
    pub async fn request_reset_password(&self, email: &str) -> Result<ApiResult> {
        validate_email(email)?;

        let descriptor = RequestDescriptor::new(Method::PUT, "").json(json!({
            "function": "request_reset_password",
            "email": email,
        }));
        self.connection.execute(descriptor).await
    }

    /// Update the password after the user followed the link in the reset
    /// mail. `reset_token` is the token from that mail.
    pub async fn update_reset_password(
        &self,
        reset_token: &str,
        password: &str,
    ) -> Result<ApiResult> {
        if reset_token.is_empty() {
            return Err(Error::invalid_argument("Please provide a reset token."));
        }
        validate_password(password)?;

        // The backend multiplexes both reset phases through one function,
        // distinguished by the token field.
        let descriptor = RequestDescriptor::new(Method::PUT, "").json(json!({
            "function": "request_reset_password",
            "token": reset_token,
            "password": password,
        }));
        self.connection.execute(descriptor).await
    }

    /// Check whether the given session token is still valid. A 404
    /// resolves with the result rather than rejecting.
    pub async fn check_session(&self, session_token: &str) -> Result<ApiResult> {
        if session_token.is_empty() {
            return Err(Error::invalid_argument("Please provide a session token."));
        }

        let descriptor = RequestDescriptor::new(Method::GET, "session.php")
            .auth_token(Some(session_token))
            .resolve_also(RESOLVE_NOT_FOUND);
        self.connection.execute(descriptor).await
    }

    /// Fetch the profile of the signed-in user. Requires a session token.
    pub async fn get_user_details(&self) -> Result<ApiResult> {
        let token = self.require_auth_token()?;

        let descriptor = RequestDescriptor::new(Method::GET, "user.php")
            .auth_token(Some(token))
            .resolve_also(RESOLVE_NOT_FOUND);
        self.connection.execute(descriptor).await
    }

    /// List the active sessions of the signed-in user. Requires a session
    /// token.
    pub async fn get_active_sessions(&self) -> Result<ApiResult> {
        let token = self.require_auth_token()?;

        let descriptor = RequestDescriptor::new(Method::GET, "sessions.php")
            .auth_token(Some(token))
            .resolve_also(RESOLVE_NOT_FOUND);
        self.connection.execute(descriptor).await
    }

    /// Invalidate the current session. Clears the stored token when the
    /// backend confirms.
    pub async fn logout(&mut self) -> Result<ApiResult> {
        let token = self.require_auth_token()?.to_string();

        let descriptor = RequestDescriptor::new(Method::DELETE, "session.php")
            .auth_token(Some(token.as_str()))
            .resolve_also(RESOLVE_NOT_FOUND);
        let result = self.connection.execute(descriptor).await?;

        if result.is_ok() {
            self.auth_token = None;
        }
        Ok(result)
    }

    fn require_auth_token(&self) -> Result<&str> {
        self.auth_token.as_deref().ok_or(Error::MissingAuthToken)
    }
}

fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || !email.contains('@') {
        return Err(Error::invalid_argument(
            "Please provide a valid email address.",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(Error::invalid_argument("Please provide a password."));
    }
    Ok(())
}
