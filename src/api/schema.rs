//! Schema index discovery and example payloads
//!
//! The server publishes a catalog of operations at `/api/v1/schemas`. Each
//! entry names an endpoint template and a method; the per-schema document
//! may carry an example request body that the dynamic tests replay.

use std::collections::HashSet;
use std::fmt;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{Error, Result};

use super::client::ApiClient;

/// Path of the schema index
pub const SCHEMA_INDEX_PATH: &str = "/api/v1/schemas";

/// HTTP method declared by a schema entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    /// Any other declared method; the dispatcher does not send these
    Other(String),
}

impl HttpMethod {
    /// Parse a declared method, case-insensitively
    ///
    /// A missing method defaults to POST, matching how the server's
    /// request schemas are authored.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Post,
            Some(m) if m.eq_ignore_ascii_case("GET") => Self::Get,
            Some(m) if m.eq_ignore_ascii_case("POST") => Self::Post,
            Some(m) => Self::Other(m.to_ascii_uppercase()),
        }
    }

    /// The reqwest method, for the methods the dispatcher supports
    pub fn as_request_method(&self) -> Option<Method> {
        match self {
            Self::Get => Some(Method::GET),
            Self::Post => Some(Method::POST),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Other(m) => write!(f, "{}", m),
        }
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.to_string()
    }
}

/// One operation from the schema index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaEntry {
    /// Unique schema id, also the sequencing key
    pub id: String,
    /// Endpoint path template, may contain `{placeholder}`s
    pub endpoint: String,
    /// Declared method
    pub method: HttpMethod,
    /// Human-readable title, when the schema has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Schema category, when the server reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SchemaEntry {
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
            method,
            name: None,
            category: None,
        }
    }
}

/// Index entry as the server sends it
#[derive(Debug, Deserialize)]
struct RawSchemaEntry {
    id: Option<String>,
    endpoint: Option<String>,
    method: Option<String>,
    name: Option<String>,
    category: Option<String>,
}

/// Example request body for one schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaExample {
    pub schema_id: String,
    pub payload: Map<String, Value>,
}

/// Client for the schema endpoints
pub struct SchemaClient<'a> {
    client: &'a ApiClient,
}

impl<'a> SchemaClient<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the schema index
    ///
    /// Any failure here is a `Discovery` error: without the index there is
    /// nothing to run. An empty index is valid.
    pub async fn discover_operations(&self) -> Result<Vec<SchemaEntry>> {
        let response = self
            .client
            .get(SCHEMA_INDEX_PATH)
            .await
            .map_err(|e| Error::Discovery(e.to_string()))?;

        if !response.is_status_success() {
            return Err(Error::Discovery(format!(
                "schema index returned status {}: {}",
                response.status,
                response.envelope().describe_error()
            )));
        }

        parse_index(&response.body)
    }

    /// Fetch the example payload for a schema
    ///
    /// Lenient by contract: every failure mode means "no example".
    pub async fn fetch_example(&self, schema_id: &str) -> Option<SchemaExample> {
        let response = match self.client.get_segment(SCHEMA_INDEX_PATH, schema_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(schema_id, error = %e, "failed to fetch schema");
                return None;
            }
        };

        if !response.is_status_success() || response.envelope().is_explicit_failure() {
            tracing::debug!(schema_id, status = response.status, "schema not available");
            return None;
        }

        let payload = extract_example(response.envelope().data()?)?;
        Some(SchemaExample {
            schema_id: schema_id.to_string(),
            payload,
        })
    }
}

/// Parse `{data: {schemas: [...]}}` into entries
fn parse_index(body: &Value) -> Result<Vec<SchemaEntry>> {
    let schemas = body
        .get("data")
        .and_then(|data| data.get("schemas"))
        .ok_or_else(|| Error::Discovery("response is missing data.schemas".to_string()))?;

    if schemas.is_null() {
        return Ok(Vec::new());
    }

    let raw = schemas
        .as_array()
        .ok_or_else(|| Error::Discovery("data.schemas is not a list".to_string()))?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(raw.len());
    for (index, value) in raw.iter().enumerate() {
        let entry = match RawSchemaEntry::deserialize(value) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(index, error = %e, "ignoring malformed schema entry");
                continue;
            }
        };
        let Some(id) = entry.id.filter(|id| !id.is_empty()) else {
            tracing::warn!("ignoring schema entry without an id");
            continue;
        };
        if !seen.insert(id.clone()) {
            return Err(Error::Discovery(format!("duplicate schema id '{}'", id)));
        }
        let Some(endpoint) = entry.endpoint.filter(|e| !e.trim().is_empty()) else {
            tracing::debug!(schema_id = %id, "schema declares no endpoint, not an operation");
            continue;
        };

        entries.push(SchemaEntry {
            id,
            endpoint,
            method: HttpMethod::parse(entry.method.as_deref()),
            name: entry.name,
            category: entry.category,
        });
    }

    Ok(entries)
}

/// Pull the example object out of a schema document
///
/// Prefers `example`, then the first object in `examples`.
fn extract_example(schema: &Value) -> Option<Map<String, Value>> {
    let candidate = schema.get("example").or_else(|| {
        schema
            .get("examples")
            .and_then(Value::as_array)
            .and_then(|examples| examples.first())
    })?;

    match candidate {
        Value::Object(map) if !map.is_empty() => Some(map.clone()),
        _ => None,
    }
}
