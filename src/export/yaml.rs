//! YAML export
//!
//! Same document as the JSON export, for reading by eye.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::FullExport;
use crate::services::BudgetReport;

/// Export the report to YAML
pub fn export_full_yaml<W: Write>(report: &BudgetReport, writer: &mut W) -> BudgetResult<()> {
    let export = FullExport::from_report(report);

    writeln!(writer, "# MoneyMage budget report")?;
    writeln!(writer, "# Budget year: {}, as of {}", report.year, report.as_of)?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::sample_report;

    #[test]
    fn test_yaml_export() {
        let mut buffer = Vec::new();
        export_full_yaml(&sample_report(), &mut buffer).unwrap();
        let yaml = String::from_utf8(buffer).unwrap();

        assert!(yaml.starts_with("# MoneyMage budget report"));
        assert!(yaml.contains("schema_version:"));
        assert!(yaml.contains("Groceries"));

        let body: String = yaml.lines().skip(5).collect::<Vec<_>>().join("\n");
        let parsed: FullExport = serde_yaml::from_str(&body).unwrap();
        assert_eq!(parsed.report.year, 2025);
    }
}
