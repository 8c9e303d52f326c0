//! Workbook repository
//!
//! One JSON workbook per budget year under the inputs directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::BudgetResult;
use crate::models::Workbook;

use super::file_io::{read_json_required, write_json_atomic};

pub struct WorkbookRepository {
    path: PathBuf,
}

impl WorkbookRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the workbook; a missing file is a not-found error
    pub fn load(&self) -> BudgetResult<Workbook> {
        let workbook: Workbook = read_json_required(&self.path)?;
        debug!(path = %self.path.display(), sheets = workbook.sheets.len(), "Loaded workbook");
        Ok(workbook)
    }

    pub fn save(&self, workbook: &Workbook) -> BudgetResult<()> {
        write_json_atomic(&self.path, workbook)?;
        debug!(path = %self.path.display(), "Saved workbook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, Sheet};
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = WorkbookRepository::new(temp_dir.path().join("Budget_2025.json"));
        assert!(!repo.exists());
        assert!(repo.load().unwrap_err().is_not_found());

        let mut workbook = Workbook::template();
        workbook.set_sheet(Sheet::new("Gifts").with_column(Column::numbers("Amount", [-25.0])));
        repo.save(&workbook).unwrap();

        assert!(repo.exists());
        assert_eq!(repo.load().unwrap(), workbook);
    }
}
