//! Test run orchestration
//!
//! Drives the server through login, then discovers the schema index and
//! exercises each operation in sequence. Per-operation problems are
//! recorded and the run continues; login and discovery failures abort it.

use colored::Colorize;
use serde::Serialize;

use crate::account::Credentials;
use crate::api::{ApiClient, AuthClient, SchemaClient, SchemaEntry, Session};
use crate::common::config::{Config, EntityConfig};
use crate::common::Result;

use super::context::TestContext;
use super::dispatch::Dispatcher;
use super::report::{print_result, Report};
use super::sequence::sequence;

/// Options for a full suite run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print the report as JSON instead of colored lines
    pub json: bool,
}

/// Result of the public endpoint probes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublicChecks {
    pub health: bool,
    pub version: bool,
}

/// Everything a suite run produced
#[derive(Debug, Serialize)]
pub struct SuiteResult {
    pub public: PublicChecks,
    pub test_entity_id: String,
    pub report: Report,
}

/// Run the full suite: public checks, login, dynamic schema tests
pub async fn run_suite(config: &Config, opts: RunOptions) -> Result<SuiteResult> {
    let echo = !opts.json;
    let credentials = Credentials::load(&config.account.credentials_file)?;
    let client = ApiClient::new(&config.server)?;

    if echo {
        println!("\n{}", "=".repeat(60));
        println!("{}", "KairoIO Server API Test Suite".bold());
        println!("{}\n", "=".repeat(60));
        println!("  Server: {}", client.base_url().dimmed());
        println!("  Test Email: {}", credentials.email);
        println!("  Test Password: {}", credentials.masked_password());
    }

    let public = check_public_endpoints(&client, echo).await;

    if echo {
        println!("\n{}", "Authentication:".cyan());
    }
    let session = AuthClient::new(&client)
        .login(&credentials.email, &credentials.password)
        .await?;
    if echo {
        println!("  {} Logged in as {}", "✓".green(), credentials.email);
    }

    let mut ctx = TestContext::new(&config.entity);
    run_dynamic_tests(&client, &session, &mut ctx, echo).await?;

    let test_entity_id = ctx.test_entity_id().to_string();
    let report = ctx.into_report();
    if echo {
        report.print_summary();
    }

    Ok(SuiteResult {
        public,
        test_entity_id,
        report,
    })
}

/// Probe `/health` and `/version`; failures are reported, never fatal
pub async fn check_public_endpoints(client: &ApiClient, echo: bool) -> PublicChecks {
    let auth = AuthClient::new(client);
    if echo {
        println!("\n{}", "Public Endpoints:".cyan());
    }

    let health = report_probe("Health check", auth.health().await, echo);
    let version = report_probe("Version check", auth.version().await, echo);
    PublicChecks { health, version }
}

fn report_probe(label: &str, result: Result<serde_json::Value>, echo: bool) -> bool {
    match result {
        Ok(body) => {
            if echo {
                println!("  {} {} passed: {}", "✓".green(), label, body);
            }
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "{} failed", label);
            if echo {
                println!("  {} {} failed: {}", "✗".red(), label, e);
            }
            false
        }
    }
}

/// Discover the schema index and exercise every operation in order
///
/// Results are appended to `ctx` in execution order.
pub async fn run_dynamic_tests(
    client: &ApiClient,
    session: &Session,
    ctx: &mut TestContext,
    echo: bool,
) -> Result<()> {
    let schemas = SchemaClient::new(client);
    let entries = sequence(schemas.discover_operations().await?);

    tracing::info!(count = entries.len(), entity = ctx.test_entity_id(), "discovered operations");
    if echo {
        println!("\n{}", "Dynamic Schema Tests:".cyan());
        println!("  Discovered {} schemas", entries.len());
        println!("  Using test entity ID: {}", ctx.test_entity_id().bold());
    }

    let bindings = ctx.bindings();
    let entity = ctx.entity().clone();
    let dispatcher = Dispatcher::new(client, session, &entity);

    for entry in &entries {
        if echo {
            println!(
                "  Testing schema: {} ({} {})",
                entry.id,
                entry.method,
                entry.endpoint.dimmed()
            );
        }

        let example = schemas.fetch_example(&entry.id).await;
        let result = dispatcher.execute(entry, example.as_ref(), &bindings).await;

        if echo {
            print_result(&result);
        }
        ctx.record(result);
    }

    Ok(())
}

/// Discover and sequence the operations without running them
pub async fn discover(config: &Config) -> Result<Vec<SchemaEntry>> {
    let client = ApiClient::new(&config.server)?;
    let entries = SchemaClient::new(&client).discover_operations().await?;
    Ok(sequence(entries))
}

/// Run the dynamic tests with an already obtained session
///
/// Used when the caller manages authentication itself.
pub async fn run_with_session(
    client: &ApiClient,
    session: &Session,
    entity: &EntityConfig,
    test_entity_id: Option<&str>,
) -> Result<Report> {
    let mut ctx = match test_entity_id {
        Some(id) => TestContext::with_entity_id(entity, id),
        None => TestContext::new(entity),
    };
    run_dynamic_tests(client, session, &mut ctx, false).await?;
    Ok(ctx.into_report())
}
