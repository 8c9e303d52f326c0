//! JSON export
//!
//! Writes a whole budget run as one versioned JSON document.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::services::BudgetReport;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full report export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub report: BudgetReport,

    pub metadata: ExportMetadata,
}

/// Counts for a quick look at an export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub category_count: usize,
    pub event_count: usize,
    pub missing_budget_count: usize,
    pub empty_budget_count: usize,
    /// Projection date range
    pub first_event: Option<String>,
    pub last_event: Option<String>,
}

impl FullExport {
    pub fn from_report(report: &BudgetReport) -> Self {
        let metadata = ExportMetadata {
            category_count: report.budgets.len(),
            event_count: report.projection.len(),
            missing_budget_count: report.missing_budgets.len(),
            empty_budget_count: report.empty_budgets.len(),
            first_event: report.projection.first().map(|e| e.date.to_string()),
            last_event: report.projection.last().map(|e| e.date.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            report: report.clone(),
            metadata,
        }
    }
}

/// Export the report to JSON
pub fn export_full_json<W: Write>(
    report: &BudgetReport,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    let export = FullExport::from_report(report);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))
}

/// Read back a JSON export, checking its schema version
pub fn read_full_json(json: &str) -> BudgetResult<FullExport> {
    let export: FullExport = serde_json::from_str(json)?;
    if export.schema_version != EXPORT_SCHEMA_VERSION {
        return Err(BudgetError::Validation(format!(
            "Schema version mismatch: expected {}, got {}",
            EXPORT_SCHEMA_VERSION, export.schema_version
        )));
    }
    Ok(export)
}
