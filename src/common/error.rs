//! Error types for the API tester
//!
//! Errors are split by how the run treats them: transport-class errors are
//! recorded per operation and the run continues, while authentication and
//! discovery errors abort the run.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the API tester
#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    #[error("Request to {url} failed: {}", transport_detail(.source))]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    // === Fatal Run Errors ===
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Schema discovery failed: {0}")]
    Discovery(String),

    #[error("Server is not reachable at {0}. Make sure the server is running")]
    ServerUnavailable(String),

    #[error("{0} operation(s) failed")]
    OperationsFailed(usize),

    // === Registration Errors ===
    #[error("Registration failed ({reason}): {message}")]
    Registration {
        reason: RegistrationFailure,
        message: String,
    },

    #[error("Invalid verification code '{0}': code must be exactly 6 digits")]
    InvalidVerificationCode(String),

    // === Credential Errors ===
    #[error("Invalid test account credentials: {0}")]
    Credentials(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why the server refused a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationFailure {
    /// The verification code was wrong or has expired
    CodeInvalidOrExpired,
    /// Anything else the server reported
    Unknown,
}

impl RegistrationFailure {
    /// Classify a server-reported registration error message
    pub fn from_message(message: &str) -> Self {
        if message.to_lowercase().contains("verification code") {
            Self::CodeInvalidOrExpired
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for RegistrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeInvalidOrExpired => write!(f, "CODE_INVALID_OR_EXPIRED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Render a reqwest error with its whole source chain
///
/// reqwest's own message is generic ("error sending request"); the cause
/// that matters, such as a timeout or a refused connection, is further down.
fn transport_detail(error: &reqwest::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = std::error::Error::source(cause);
    }
    if error.is_timeout() && !parts.iter().any(|p| p.contains("timed out")) {
        parts.push("timed out".to_string());
    }
    parts.join(": ")
}

impl Error {
    /// Create a transport error for a request URL
    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_string(),
            source,
        }
    }

    /// Create a malformed response error
    pub fn malformed(url: &str, reason: impl fmt::Display) -> Self {
        Self::MalformedResponse {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a registration error, classifying the server message
    pub fn registration(message: &str) -> Self {
        Self::Registration {
            reason: RegistrationFailure::from_message(message),
            message: message.to_string(),
        }
    }

    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::Discovery(_))
    }

    /// Process exit status for this error
    ///
    /// 2 means the run completed but operations failed; 1 is everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::OperationsFailed(_) => 2,
            _ => 1,
        }
    }
}
