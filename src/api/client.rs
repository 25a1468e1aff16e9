//! HTTP client for the server under test

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, Url};
use serde_json::Value;

use crate::common::config::ServerConfig;
use crate::common::{join_url, Error, Result};

use super::envelope::Envelope;

/// A completed HTTP exchange with a decoded JSON body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Fully resolved request URL
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Decoded response body
    pub body: Value,
}

impl ApiResponse {
    pub fn envelope(&self) -> Envelope<'_> {
        Envelope::new(&self.body)
    }

    pub fn is_status_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin wrapper over a reqwest client bound to one server
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from server settings
    pub fn new(server: &ServerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(server.timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: server.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Absolute URL for `path` followed by one percent-encoded segment
    ///
    /// Use this for opaque ids: a `/`, `?` or `#` in `segment` stays part of
    /// the segment instead of changing the resource.
    pub fn segment_url(&self, path: &str, segment: &str) -> Result<String> {
        let base = self.url(path);
        let mut url = Url::parse(&base)
            .map_err(|e| Error::Config(format!("invalid URL '{}': {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("URL '{}' cannot take a path", base)))?
            .pop_if_empty()
            .push(segment);
        Ok(url.into())
    }

    /// Unauthenticated GET
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, None, None).await
    }

    /// Unauthenticated GET of `path/<segment>`, see [`ApiClient::segment_url`]
    pub async fn get_segment(&self, path: &str, segment: &str) -> Result<ApiResponse> {
        let url = self.segment_url(path, segment)?;
        self.send_to(Method::GET, url, None, None).await
    }

    /// Unauthenticated POST with a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send(Method::POST, path, None, Some(body)).await
    }

    /// Issue exactly one request and decode the body as JSON
    ///
    /// Any completed response is returned regardless of status; only a
    /// failed exchange or an undecodable body is an error.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        self.send_to(method, self.url(path), bearer, body).await
    }

    async fn send_to(
        &self,
        method: Method,
        url: String,
        bearer: Option<&str>,
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        tracing::debug!(%method, %url, authenticated = bearer.is_some(), "sending request");

        let mut request = self
            .http
            .request(method, &url)
            .header(USER_AGENT, "kairo-tester")
            .header(ACCEPT, "application/json");
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(&url, e))?;

        tracing::debug!(%url, status, bytes = text.len(), "received response");

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            Error::malformed(&url, format!("status {}, body is not JSON ({})", status, e))
        })?;

        Ok(ApiResponse { url, status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ServerConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_path() {
        let client = client("http://localhost:8080/");
        assert_eq!(client.url("/health"), "http://localhost:8080/health");
    }

    #[test]
    fn test_segment_url_escapes_reserved_characters() {
        let client = client("http://localhost:8080");
        assert_eq!(
            client.segment_url("/api/v1/schemas", "robots/v2?x#y").unwrap(),
            "http://localhost:8080/api/v1/schemas/robots%2Fv2%3Fx%23y"
        );
        assert_eq!(
            client.segment_url("/api/v1/schemas", "robot_status").unwrap(),
            "http://localhost:8080/api/v1/schemas/robot_status"
        );
    }

    #[test]
    fn test_segment_url_keeps_base_path_prefix() {
        let client = client("http://fleet.example.com/kairo/");
        assert_eq!(
            client.segment_url("/api/v1/schemas", "a b").unwrap(),
            "http://fleet.example.com/kairo/api/v1/schemas/a%20b"
        );
    }
}
