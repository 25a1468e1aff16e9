//! Authenticated request dispatch and outcome classification

use serde_json::{Map, Value};

use crate::api::{ApiClient, ApiResponse, SchemaEntry, SchemaExample, Session};

use super::context::EntityTarget;
use super::placeholder::{canonical_name, resolve, Bindings};
use super::report::OperationResult;

/// Status codes that count as success
const SUCCESS_STATUSES: [u16; 2] = [200, 201];

/// Decide whether a response is a pass
///
/// The status must be 200 or 201 and the body must not carry an explicit
/// `success: false`. A missing flag passes: not every endpoint wraps its
/// answer in the standard envelope.
pub fn classify(status: u16, body: &Value) -> bool {
    SUCCESS_STATUSES.contains(&status) && body.get("success") != Some(&Value::Bool(false))
}

/// Replace every spelling of the entity id field at the top of a payload
///
/// Returns how many fields were replaced.
pub fn overwrite_entity_id(payload: &mut Map<String, Value>, field: &str, id: &str) -> usize {
    let field = canonical_name(field);
    let mut replaced = 0;
    for (key, value) in payload.iter_mut() {
        if canonical_name(key) == field {
            *value = Value::String(id.to_string());
            replaced += 1;
        }
    }
    replaced
}

/// Issues one authenticated call per operation
pub struct Dispatcher<'a> {
    client: &'a ApiClient,
    session: &'a Session,
    entity: &'a EntityTarget,
}

impl<'a> Dispatcher<'a> {
    pub fn new(client: &'a ApiClient, session: &'a Session, entity: &'a EntityTarget) -> Self {
        Self {
            client,
            session,
            entity,
        }
    }

    /// Exercise one operation and classify the outcome
    ///
    /// Never returns an error: transport problems become a `Failure` result
    /// and the run moves on.
    pub async fn execute(
        &self,
        entry: &SchemaEntry,
        example: Option<&SchemaExample>,
        bindings: &Bindings,
    ) -> OperationResult {
        let Some(example) = example else {
            return OperationResult::skipped(&entry.id, "no example found");
        };
        let Some(method) = entry.method.as_request_method() else {
            return OperationResult::skipped(
                &entry.id,
                format!("unsupported method {}", entry.method),
            );
        };

        let path = resolve(&entry.endpoint, bindings);

        let mut payload = example.payload.clone();
        if self.entity.is_create_operation(&entry.id) {
            let replaced =
                overwrite_entity_id(&mut payload, &self.entity.field, &self.entity.test_entity_id);
            tracing::debug!(schema_id = %entry.id, replaced, "stamped test entity id into payload");
        }

        let body = (method == reqwest::Method::POST).then(|| Value::Object(payload));
        let response = self
            .client
            .send(method, &path, Some(self.session.token()), body.as_ref())
            .await;

        match response {
            Ok(response) => classify_response(&entry.id, &response),
            Err(e) => {
                tracing::debug!(schema_id = %entry.id, error = %e, "request did not complete");
                OperationResult::failure(&entry.id, e.to_string())
            }
        }
    }
}

fn classify_response(schema_id: &str, response: &ApiResponse) -> OperationResult {
    if classify(response.status, &response.body) {
        OperationResult::success(schema_id, format!("status {}", response.status))
    } else {
        OperationResult::failure(
            schema_id,
            format!("status {}: {}", response.status, response.body),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_flag_is_success() {
        assert!(classify(200, &json!({"data": {"robots": []}})));
        assert!(classify(201, &json!({"success": true})));
        assert!(classify(200, &json!([1, 2, 3])));
    }

    #[test]
    fn test_explicit_false_or_bad_status_fails() {
        assert!(!classify(200, &json!({"success": false, "error": "nope"})));
        assert!(!classify(204, &json!({"success": true})));
        assert!(!classify(400, &json!({"data": {}})));
        assert!(!classify(500, &json!({"success": true})));
    }

    #[test]
    fn test_non_bool_flag_is_not_explicit_false() {
        assert!(classify(200, &json!({"success": "false"})));
        assert!(classify(200, &json!({"success": null})));
    }

    #[test]
    fn test_overwrite_entity_id_all_spellings() {
        let mut payload = json!({
            "robot_id": "example-1",
            "robotId": "example-2",
            "robot_name": "Demo",
            "nested": {"robot_id": "kept"}
        })
        .as_object()
        .cloned()
        .unwrap();

        let replaced = overwrite_entity_id(&mut payload, "robot_id", "test-robot-dynamic-4242");
        assert_eq!(replaced, 2);
        assert_eq!(payload["robot_id"], "test-robot-dynamic-4242");
        assert_eq!(payload["robotId"], "test-robot-dynamic-4242");
        assert_eq!(payload["robot_name"], "Demo");
        assert_eq!(payload["nested"]["robot_id"], "kept");
    }

    #[test]
    fn test_overwrite_entity_id_absent_field() {
        let mut payload = json!({"name": "x"}).as_object().cloned().unwrap();
        assert_eq!(overwrite_entity_id(&mut payload, "robotId", "id"), 0);
        assert!(!payload.contains_key("robot_id"));
    }
}
