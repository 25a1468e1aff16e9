//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod mock_server;

use kairo_tester::api::ApiClient;
use kairo_tester::common::config::{EntityConfig, ServerConfig};

/// API client pointed at a mock server
pub fn client_for(base_url: &str) -> ApiClient {
    client_with_timeout(base_url, 5)
}

/// API client with a custom per-request timeout
pub fn client_with_timeout(base_url: &str, timeout_secs: u64) -> ApiClient {
    ApiClient::new(&ServerConfig {
        base_url: base_url.to_string(),
        timeout_secs,
    })
    .expect("build client")
}

/// Entity settings for the generic `things` fixture API
pub fn things_entity() -> EntityConfig {
    EntityConfig {
        placeholder: "thing_id".to_string(),
        create_operation: "a_create".to_string(),
        id_prefix: "test-thing-".to_string(),
    }
}
