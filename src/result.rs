//! Uniform response value object.
//!
//! Every completed HTTP exchange maps into one [`ApiResult`] carrying the
//! backend's status code, message, and opaque payload. Constructed once,
//! never mutated.

use serde_json::Value;

/// Normalized backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    status_code: u16,
    message: String,
    data: Option<Value>,
}

impl ApiResult {
    /// Create a result from a completed exchange. Construction always
    /// succeeds; the fields are read-only afterwards.
    pub fn new(status_code: u16, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status_code,
            message: message.into(),
            data,
        }
    }

    /// Backend-defined status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Human-readable backend message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Opaque payload: object, array, scalar, or absent.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// True when the status code is in the 2xx range.
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status_code)
    }
}
