//! CLI command definitions
//!
//! Defines the clap commands for the API tester.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::common::config::Config;
use crate::common::Result;

/// Flags accepted by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL, overrides the configuration file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Test account file (email, password, code on three lines)
    #[arg(long, global = true)]
    pub account_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load the configuration file and apply command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        config.with_overrides(self.base_url.clone(), self.account_file.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full suite: public checks, login, and every discovered operation
    Run {
        /// Exit with status 2 if any operation failed
        #[arg(long)]
        strict: bool,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the operations in the schema index, in execution order
    Schemas {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a test account interactively and save its credentials
    Register,

    /// Check the public /health and /version endpoints
    Health,
}
