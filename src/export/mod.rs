//! Export module for MoneyMage
//!
//! Output formats for a budget run:
//! - Workbook: the updated budget workbook with derived sheets
//! - JSON / YAML: the whole report, versioned
//! - CSV: one table at a time

pub mod csv;
pub mod json;
pub mod workbook;
pub mod yaml;

pub use self::csv::{
    export_balances_csv, export_projection_csv, export_remaining_csv, export_summary_csv,
};
pub use json::{export_full_json, read_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use workbook::render_workbook;
pub use yaml::export_full_yaml;
