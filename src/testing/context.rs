//! Per-run state: the test entity and the accumulated results

use rand::Rng;

use crate::common::config::EntityConfig;

use super::placeholder::{canonical_name, Bindings};
use super::report::{OperationResult, Report};

/// The entity a run creates and then addresses in later operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTarget {
    /// Canonical placeholder/field name carrying the entity id
    pub field: String,
    /// Schema id of the creating operation
    pub create_operation: String,
    /// Id generated for this run
    pub test_entity_id: String,
}

impl EntityTarget {
    pub fn new(config: &EntityConfig, test_entity_id: impl Into<String>) -> Self {
        Self {
            field: canonical_name(&config.placeholder),
            create_operation: config.create_operation.clone(),
            test_entity_id: test_entity_id.into(),
        }
    }

    pub fn is_create_operation(&self, schema_id: &str) -> bool {
        self.create_operation == schema_id
    }
}

/// Generate a fresh entity id: prefix plus a four-digit random suffix
pub fn generate_entity_id(prefix: &str) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(1000..=9999);
    format!("{}{}", prefix, suffix)
}

/// Mutable state of one run
#[derive(Debug)]
pub struct TestContext {
    entity: EntityTarget,
    report: Report,
}

impl TestContext {
    /// Start a run, generating its entity id once
    pub fn new(config: &EntityConfig) -> Self {
        let id = generate_entity_id(&config.id_prefix);
        Self::with_entity_id(config, id)
    }

    /// Start a run with a fixed entity id
    pub fn with_entity_id(config: &EntityConfig, id: impl Into<String>) -> Self {
        Self {
            entity: EntityTarget::new(config, id),
            report: Report::new(),
        }
    }

    pub fn test_entity_id(&self) -> &str {
        &self.entity.test_entity_id
    }

    pub fn entity(&self) -> &EntityTarget {
        &self.entity
    }

    /// Placeholder bindings for every path in the run
    pub fn bindings(&self) -> Bindings {
        Bindings::new().with(&self.entity.field, self.entity.test_entity_id.clone())
    }

    pub fn record(&mut self, result: OperationResult) {
        self.report.record(result);
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn into_report(self) -> Report {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = generate_entity_id("test-robot-dynamic-");
        let suffix = id.strip_prefix("test-robot-dynamic-").unwrap();
        let n: u16 = suffix.parse().unwrap();
        assert!((1000..=9999).contains(&n));
    }

    #[test]
    fn test_entity_id_is_stable_for_the_run() {
        let ctx = TestContext::new(&EntityConfig::default());
        let first = ctx.test_entity_id().to_string();
        assert_eq!(ctx.test_entity_id(), first);
        assert_eq!(ctx.bindings().get("robotId"), Some(first.as_str()));
        assert_eq!(ctx.bindings().get("robot_id"), Some(first.as_str()));
    }

    #[test]
    fn test_camel_case_placeholder_config() {
        let config = EntityConfig {
            placeholder: "thingId".to_string(),
            create_operation: "a_create".to_string(),
            id_prefix: "t-".to_string(),
        };
        let ctx = TestContext::with_entity_id(&config, "t-1234");
        assert_eq!(ctx.entity().field, "thing_id");
        assert!(ctx.entity().is_create_operation("a_create"));
        assert!(!ctx.entity().is_create_operation("b_read"));
    }
}
