//! Common utilities shared by the CLI and the test engine

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, RegistrationFailure, Result};

/// Join a base URL and an API path without doubling or dropping the slash
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
