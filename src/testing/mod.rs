//! Schema-driven test engine
//!
//! Discovers the server's operation catalog, orders it, resolves path
//! placeholders against a per-run test entity, dispatches each operation
//! with the session token, and records a pass/fail line per operation.

pub mod context;
pub mod dispatch;
pub mod placeholder;
pub mod report;
pub mod runner;
pub mod sequence;

pub use context::{EntityTarget, TestContext};
pub use dispatch::{classify, Dispatcher};
pub use placeholder::{canonical_name, resolve, Bindings};
pub use report::{OperationResult, Outcome, Report, Summary};
pub use runner::{run_suite, RunOptions, SuiteResult};
pub use sequence::sequence;
