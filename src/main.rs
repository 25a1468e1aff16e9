//! KairoIO API tester
//!
//! Logs in to a KairoIO server, discovers its schema index, and exercises
//! every published operation, printing a pass/fail line for each.

use clap::Parser;
use kairo_tester::commands::{Commands, GlobalArgs};
use kairo_tester::{cli, common::logging};

#[derive(Parser)]
#[command(name = "kairo-tester", about = "Schema-driven API tester for KairoIO servers")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.global.verbose);

    if let Err(e) = cli::dispatch(cli.command, &cli.global).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
