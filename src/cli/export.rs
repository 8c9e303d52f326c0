//! Export command
//!
//! Writes the whole report of a run to one file.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::export::{export_full_json, export_full_yaml};
use crate::storage::write_atomic;

use super::update::{run_pipeline, InputArgs};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// JSON (machine-readable)
    Json,
    /// YAML (human-readable)
    Yaml,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Handle the export command
pub fn handle_export_command(
    paths: &BudgetPaths,
    settings: &Settings,
    args: ExportArgs,
) -> BudgetResult<()> {
    let storage = args.input.storage(paths, settings)?;
    let (_, report) = run_pipeline(&storage, settings, &args.input)?;

    write_atomic(&args.output, |writer| match args.format {
        ExportFormat::Json => export_full_json(&report, writer, true),
        ExportFormat::Yaml => export_full_yaml(&report, writer),
    })?;

    println!(
        "Exported {} categories and {} projection events to {}",
        report.budgets.len(),
        report.projection.len(),
        args.output.display()
    );
    Ok(())
}
