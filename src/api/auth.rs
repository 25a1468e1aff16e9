//! Account registration, login, and the public status endpoints

use std::fmt;

use serde_json::{json, Value};

use crate::common::{Error, Result};

use super::client::{ApiClient, ApiResponse};

pub const HEALTH_PATH: &str = "/health";
pub const VERSION_PATH: &str = "/version";
pub const SEND_CODE_PATH: &str = "/api/v1/auth/register/send-code";
pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Length of a verification code
const CODE_LENGTH: usize = 6;

/// An authenticated session
///
/// Holds the certification key that stamps every authenticated request.
/// Never written to disk.
#[derive(Clone)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The bearer credential
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// A well-formed verification code: exactly six ASCII digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Validate a code before it is sent anywhere
    pub fn parse(input: &str) -> Result<Self> {
        let code = input.trim();
        if code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err(Error::InvalidVerificationCode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of asking the server for a verification code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeRequest {
    /// Code generated and emailed
    Delivered,
    /// Code generated and stored, but the email could not be sent
    GeneratedNotDelivered(String),
    /// The server refused to generate a code
    Rejected(String),
}

impl CodeRequest {
    /// Whether a code now exists server-side, which is all registration needs
    pub fn code_exists(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// A freshly registered account
#[derive(Debug, Clone)]
pub struct Registration {
    pub account_id: Option<String>,
    pub session: Session,
}

/// Client for the authentication and public endpoints
pub struct AuthClient<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthClient<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Value> {
        public_status(self.client.get(HEALTH_PATH).await?)
    }

    /// `GET /version`
    pub async fn version(&self) -> Result<Value> {
        public_status(self.client.get(VERSION_PATH).await?)
    }

    /// Log in and obtain a session
    ///
    /// `identifier` is whatever the server accepts as a principal, usually
    /// an email address.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Session> {
        let body = json!({ "username": identifier, "password": secret });
        let response = self
            .client
            .post(LOGIN_PATH, &body)
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;

        let envelope = response.envelope();
        if !response.is_status_success() || !envelope.is_success() {
            return Err(Error::Auth(envelope.describe_error()));
        }

        let token = envelope.data_str("certification_key").ok_or_else(|| {
            Error::Auth("login response is missing data.certification_key".to_string())
        })?;

        tracing::info!(identifier, "logged in");
        Ok(Session::new(token))
    }

    /// Ask the server to generate and email a verification code
    ///
    /// A failed email send still leaves a usable code on the server, so it
    /// is reported as `GeneratedNotDelivered` rather than a rejection.
    pub async fn request_verification_code(&self, identifier: &str) -> Result<CodeRequest> {
        let body = json!({ "email": identifier });
        let response = self.client.post(SEND_CODE_PATH, &body).await?;
        let envelope = response.envelope();

        if response.is_status_success() && envelope.is_success() {
            return Ok(CodeRequest::Delivered);
        }

        let message = envelope.describe_error();
        if response.status >= 500 && is_delivery_failure(&message) {
            tracing::warn!(identifier, %message, "verification code generated but not delivered");
            Ok(CodeRequest::GeneratedNotDelivered(message))
        } else {
            Ok(CodeRequest::Rejected(message))
        }
    }

    /// Register a new account with a verification code
    pub async fn register_account(
        &self,
        identifier: &str,
        secret: &str,
        code: &VerificationCode,
    ) -> Result<Registration> {
        let body = json!({
            "email": identifier,
            "password": secret,
            "code": code.as_str(),
        });
        let response = self.client.post(REGISTER_PATH, &body).await?;
        let envelope = response.envelope();

        if !response.is_status_success() || !envelope.is_success() {
            return Err(Error::registration(&envelope.describe_error()));
        }

        let token = envelope.data_str("certification_key").ok_or_else(|| {
            Error::registration("registration response is missing data.certification_key")
        })?;
        let account_id = envelope
            .data_str("id")
            .or_else(|| envelope.data_str("account_id"))
            .map(str::to_string);

        tracing::info!(identifier, ?account_id, "account registered");
        Ok(Registration {
            account_id,
            session: Session::new(token),
        })
    }
}

fn public_status(response: ApiResponse) -> Result<Value> {
    if response.is_status_success() {
        Ok(response.body)
    } else {
        Err(Error::UnexpectedStatus {
            url: response.url,
            status: response.status,
        })
    }
}

/// Whether a send-code error reports a mail delivery problem
fn is_delivery_failure(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("email") || message.contains("smtp") || message.contains("send")
}
