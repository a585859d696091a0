//! driftplan CLI
//!
//! Command-line interface for driftplan

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "driftplan")]
#[command(about = "driftplan - preview configuration drift before apply", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff a declaration repository against a remote snapshot
    Plan(commands::plan::PlanArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan(args) => commands::plan::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
