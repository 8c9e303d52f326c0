//! Report command
//!
//! Runs the pipeline read-only and renders one of its outputs.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::display;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{
    export_balances_csv, export_projection_csv, export_remaining_csv, export_summary_csv,
};
use crate::services::{BudgetReport, QuarterSummary, YearSummary};
use crate::storage::write_atomic;

use super::update::{run_pipeline, InputArgs};

/// Which output of a run to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Master projection with running balance
    Projection,
    /// Forecast-only projection of next year
    Ideal,
    /// Category-by-month overview of the budget year
    Monthly,
    /// Quarterly and yearly summaries
    Summary,
    /// Remaining expense per category for five years
    Remaining,
    /// Projected year-end balances
    Balances,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
    Csv,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Report to show
    #[arg(value_enum)]
    pub kind: ReportKind,

    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct SummaryView<'a> {
    quarterly: &'a [QuarterSummary],
    yearly: &'a [YearSummary],
}

/// Handle the report command
pub fn handle_report_command(
    paths: &BudgetPaths,
    settings: &Settings,
    args: ReportArgs,
) -> BudgetResult<()> {
    let storage = args.input.storage(paths, settings)?;
    let (_, report) = run_pipeline(&storage, settings, &args.input)?;
    let rendered = render_report(&report, args.kind, args.format, settings)?;

    match args.output {
        Some(path) => {
            write_atomic(&path, |writer| Ok(writer.write_all(&rendered)?))?;
            println!("Wrote {:?} report to {}", args.kind, path.display());
        }
        None => std::io::stdout().write_all(&rendered)?,
    }
    Ok(())
}

/// Render one report in the requested format
pub fn render_report(
    report: &BudgetReport,
    kind: ReportKind,
    format: OutputFormat,
    settings: &Settings,
) -> BudgetResult<Vec<u8>> {
    let fmt = settings.date_format.as_str();
    let summary = SummaryView {
        quarterly: &report.quarterly_summary,
        yearly: &report.yearly_summary,
    };

    let mut out = Vec::new();
    match format {
        OutputFormat::Table => {
            let text = match kind {
                ReportKind::Projection => {
                    display::format_projection("Projection", &report.projection, fmt)
                }
                ReportKind::Ideal => {
                    display::format_projection("Ideal Projection", &report.ideal_projection, fmt)
                }
                ReportKind::Monthly => report.monthly.format_terminal(),
                ReportKind::Summary => {
                    display::format_summary(&report.quarterly_summary, &report.yearly_summary)
                }
                ReportKind::Remaining => display::format_remaining(&report.remaining_expenses),
                ReportKind::Balances => display::format_balances(&report.balances),
            };
            out.extend_from_slice(text.as_bytes());
        }
        OutputFormat::Json => {
            match kind {
                ReportKind::Projection => serde_json::to_writer_pretty(&mut out, &report.projection),
                ReportKind::Ideal => serde_json::to_writer_pretty(&mut out, &report.ideal_projection),
                ReportKind::Monthly => serde_json::to_writer_pretty(&mut out, &report.monthly),
                ReportKind::Summary => serde_json::to_writer_pretty(&mut out, &summary),
                ReportKind::Remaining => {
                    serde_json::to_writer_pretty(&mut out, &report.remaining_expenses)
                }
                ReportKind::Balances => serde_json::to_writer_pretty(&mut out, &report.balances),
            }?;
            out.push(b'\n');
        }
        OutputFormat::Yaml => match kind {
            ReportKind::Projection => serde_yaml::to_writer(&mut out, &report.projection),
            ReportKind::Ideal => serde_yaml::to_writer(&mut out, &report.ideal_projection),
            ReportKind::Monthly => serde_yaml::to_writer(&mut out, &report.monthly),
            ReportKind::Summary => serde_yaml::to_writer(&mut out, &summary),
            ReportKind::Remaining => serde_yaml::to_writer(&mut out, &report.remaining_expenses),
            ReportKind::Balances => serde_yaml::to_writer(&mut out, &report.balances),
        }
        .map_err(|e| BudgetError::Export(e.to_string()))?,
        OutputFormat::Csv => match kind {
            ReportKind::Projection => export_projection_csv(&report.projection, fmt, &mut out)?,
            ReportKind::Ideal => export_projection_csv(&report.ideal_projection, fmt, &mut out)?,
            ReportKind::Monthly => report.monthly.export_csv(&mut out)?,
            ReportKind::Summary => {
                export_summary_csv(&report.quarterly_summary, &report.yearly_summary, &mut out)?
            }
            ReportKind::Remaining => export_remaining_csv(&report.remaining_expenses, &mut out)?,
            ReportKind::Balances => export_balances_csv(&report.balances, &mut out)?,
        },
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::sample_report;

    fn render(kind: ReportKind, format: OutputFormat) -> String {
        let bytes = render_report(&sample_report(), kind, format, &Settings::default()).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_every_kind_renders_in_every_format() {
        for kind in ReportKind::value_variants() {
            for format in OutputFormat::value_variants() {
                assert!(!render(*kind, *format).is_empty(), "{:?} {:?}", kind, format);
            }
        }
    }

    #[test]
    fn test_json_projection_is_an_array() {
        let value: serde_json::Value =
            serde_json::from_str(&render(ReportKind::Projection, OutputFormat::Json)).unwrap();
        let events = value.as_array().unwrap();
        assert_eq!(events[0]["category"], "Groceries");
    }

    #[test]
    fn test_summary_json_has_both_tables() {
        let value: serde_json::Value =
            serde_json::from_str(&render(ReportKind::Summary, OutputFormat::Json)).unwrap();
        assert_eq!(value["quarterly"].as_array().unwrap().len(), 4);
        assert!(value["yearly"].as_array().unwrap().is_empty());
    }
}
