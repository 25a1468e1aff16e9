//! KairoIO API tester - schema-driven smoke tests for a robot-fleet API
//!
//! This library logs in to the server, discovers its operation catalog, and
//! exercises each operation with the server's own example payloads.

pub mod account;
pub mod api;
pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use testing::{OperationResult, Outcome, Report};
