//! Shared HTTP plumbing for the domain clients.
//!
//! Every public operation builds one [`RequestDescriptor`] synchronously
//! (validation and session snapshot happen before any network activity),
//! then hands it to [`Connection::execute`], which signs it, dispatches it
//! exactly once, and maps the backend's `{status, message, body}` envelope
//! into an [`ApiResult`]. There are no retries and no SDK-side timeout.

use reqwest::multipart::Form;
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::credentials::AppCredentials;
use crate::error::{Error, Result};
use crate::result::ApiResult;
use crate::VERSION;

/// User agent string for API requests.
fn user_agent() -> String {
    format!("schmucklicloud.sdk/{} (rust)", VERSION)
}

/// Signed connection to one backend service endpoint.
#[derive(Debug, Clone)]
pub(crate) struct Connection {
    http: Client,
    base_url: String,
    credentials: AppCredentials,
}

impl Connection {
    /// Create a connection against the given service base URL.
    pub(crate) fn new(base_url: impl Into<String>, credentials: AppCredentials) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }

    /// The service base URL this connection targets.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign and dispatch one request, mapping the response envelope.
    pub(crate) async fn execute(&self, descriptor: RequestDescriptor) -> Result<ApiResult> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            descriptor.path
        );

        let mut request = self
            .http
            .request(descriptor.method.clone(), &url)
            .header("appid", &self.credentials.app_id)
            .header("appsecret", &self.credentials.app_secret);

        if let Some(token) = &descriptor.auth_token {
            request = request.header("authtoken", token);
        }
        if !descriptor.query.is_empty() {
            request = request.query(&descriptor.query);
        }
        request = match descriptor.payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => request.multipart(form),
        };

        debug!("{} {}", descriptor.method, url);
        let response = request.send().await?;
        map_response(response, descriptor.resolve_also).await
    }
}

/// Backend response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    body: Option<Value>,
}

/// Map a raw HTTP response into an [`ApiResult`] or an error.
///
/// 2xx resolves with the envelope. Statuses listed in `resolve_also`
/// (404 for read/session operations, 300 for the authorize challenge)
/// also resolve, synthesized from the HTTP status when the body is not
/// an envelope. Everything else rejects with the backend's message.
async fn map_response(response: Response, resolve_also: &'static [u16]) -> Result<ApiResult> {
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or("Unknown").to_string();
    let text = response.text().await?;
    let envelope = serde_json::from_str::<Envelope>(&text).ok();

    if status.is_success() {
        let envelope = envelope
            .ok_or_else(|| Error::Internal(format!("Failed to parse response: {}", text)))?;
        debug!("backend status {}: {}", envelope.status, envelope.message);
        return Ok(ApiResult::new(envelope.status, envelope.message, envelope.body));
    }

    if resolve_also.contains(&status.as_u16()) {
        return Ok(match envelope {
            Some(envelope) => ApiResult::new(envelope.status, envelope.message, envelope.body),
            None => ApiResult::new(status.as_u16(), status_text, None),
        });
    }

    let message = envelope
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or(text);
    Err(Error::api(status.as_u16(), status_text, message))
}

/// Request body variants.
pub(crate) enum Payload {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// One outbound request, built fresh per call and consumed by
/// [`Connection::execute`]. Captures session state at build time.
pub(crate) struct RequestDescriptor {
    method: Method,
    path: &'static str,
    query: Vec<(&'static str, String)>,
    payload: Payload,
    auth_token: Option<String>,
    resolve_also: &'static [u16],
}

impl RequestDescriptor {
    pub(crate) fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            payload: Payload::Empty,
            auth_token: None,
            resolve_also: &[],
        }
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub(crate) fn json(mut self, body: Value) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    pub(crate) fn multipart(mut self, form: Form) -> Self {
        self.payload = Payload::Multipart(form);
        self
    }

    pub(crate) fn auth_token(mut self, token: Option<&str>) -> Self {
        self.auth_token = token.map(String::from);
        self
    }

    /// Extra HTTP statuses that resolve instead of rejecting.
    pub(crate) fn resolve_also(mut self, statuses: &'static [u16]) -> Self {
        self.resolve_also = statuses;
        self
    }
}
