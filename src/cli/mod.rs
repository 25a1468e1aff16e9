//! CLI command handling
//!
//! Dispatches CLI commands to the test engine and formats output.

pub mod register;

use colored::Colorize;

use crate::api::{ApiClient, SchemaEntry};
use crate::commands::{Commands, GlobalArgs};
use crate::common::{Error, Result};
use crate::testing::runner::{self, check_public_endpoints, RunOptions};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, global: &GlobalArgs) -> Result<()> {
    let config = global.load_config()?;
    tracing::debug!(base_url = %config.server.base_url, "loaded configuration");

    match command {
        Commands::Run { strict, json } => {
            let result = runner::run_suite(&config, RunOptions { json }).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("\n{}", "=".repeat(60));
                println!("{} Test suite completed!", "✓".green());
                println!("{}\n", "=".repeat(60));
            }

            let failures = result.report.summary().failures;
            if strict && failures > 0 {
                return Err(Error::OperationsFailed(failures));
            }
            Ok(())
        }

        Commands::Schemas { json } => {
            let entries = runner::discover(&config).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No operations in the schema index");
            } else {
                println!("Operations ({}), in execution order:", entries.len());
                for entry in &entries {
                    print_entry(entry);
                }
            }
            Ok(())
        }

        Commands::Register => register::run(&config).await,

        Commands::Health => {
            let client = ApiClient::new(&config.server)?;
            let checks = check_public_endpoints(&client, true).await;
            if checks.health {
                Ok(())
            } else {
                Err(Error::ServerUnavailable(client.base_url().to_string()))
            }
        }
    }
}

fn print_entry(entry: &SchemaEntry) {
    let title = entry
        .name
        .as_deref()
        .filter(|name| *name != entry.id)
        .map(|name| format!(" ({})", name))
        .unwrap_or_default();
    println!(
        "  {:<6} {:<40} {}{}",
        entry.method.to_string(),
        entry.endpoint,
        entry.id,
        title.dimmed()
    );
}
