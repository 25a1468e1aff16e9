//! Clients for the server under test
//!
//! Every endpoint answers with the same JSON envelope, decoded leniently by
//! [`envelope::Envelope`].

pub mod auth;
pub mod client;
pub mod envelope;
pub mod schema;

pub use auth::{AuthClient, CodeRequest, Registration, Session, VerificationCode};
pub use client::{ApiClient, ApiResponse};
pub use schema::{HttpMethod, SchemaClient, SchemaEntry, SchemaExample};
