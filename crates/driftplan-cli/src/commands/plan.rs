//! Plan command
//!
//! Usage: driftplan plan --snapshot <FILE> [--repo <DIR>] [--group <NAME>]
//! [--default <FILE>] [--format markdown|json] [--output <FILE>] [--log-json]

use clap::{Args, ValueEnum};
use driftplan_core::diff::{render_json, render_markdown};
use driftplan_core::logging_facility::{init, Profile};
use driftplan_engine::{plan, JsonSnapshotFile, PlanRequest};
use driftplan_loader::LoadOptions;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Declaration repository root
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Remote snapshot serialized as JSON
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Only plan this group (case-insensitive); skips the global scope
    #[arg(long)]
    pub group: Option<String>,

    /// Global declaration file (default: <repo>/default.yml)
    #[arg(long = "default")]
    pub global_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

/// Execute plan command
pub fn execute(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    init(if args.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let mut load = LoadOptions::new(args.repo);
    load.global_file = args.global_file;
    let request = PlanRequest {
        load,
        group_filter: args.group,
    };

    let outcome = plan(&request, &JsonSnapshotFile::new(args.snapshot))?;

    for err in &outcome.parse_errors {
        eprintln!("warning: {}", err);
    }

    let rendered = match args.format {
        OutputFormat::Markdown => render_markdown(&outcome.results),
        OutputFormat::Json => render_json(&outcome.results)?,
    };

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, rendered)?;
        println!("✓ Plan written to {}", output_path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}
