//! Response envelope used by the server
//!
//! Most endpoints answer `{success, data?, error?, message?}`, but schema
//! authors are not consistent, so every field is optional and read leniently.

use serde_json::Value;

/// View over a decoded response body
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    body: &'a Value,
}

impl<'a> Envelope<'a> {
    pub fn new(body: &'a Value) -> Self {
        Self { body }
    }

    /// The explicit `success` flag, if the body carries a boolean one
    pub fn success_flag(&self) -> Option<bool> {
        self.body.get("success").and_then(Value::as_bool)
    }

    /// True only when the server explicitly reported `success: true`
    pub fn is_success(&self) -> bool {
        self.success_flag() == Some(true)
    }

    /// True only when the server explicitly reported `success: false`
    pub fn is_explicit_failure(&self) -> bool {
        self.success_flag() == Some(false)
    }

    /// The `data` payload, if present
    pub fn data(&self) -> Option<&'a Value> {
        self.body.get("data")
    }

    /// A string field inside `data`
    pub fn data_str(&self, key: &str) -> Option<&'a str> {
        self.data().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    /// The server-reported error text, falling back to `message`
    pub fn error_message(&self) -> Option<&'a str> {
        self.body
            .get("error")
            .and_then(Value::as_str)
            .or_else(|| self.body.get("message").and_then(Value::as_str))
    }

    /// Error text for user-facing messages, never empty
    pub fn describe_error(&self) -> String {
        self.error_message()
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}
