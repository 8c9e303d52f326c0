//! Init command
//!
//! Creates the data directories, the settings file and an empty workbook.

use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::models::Workbook;
use crate::storage::WorkbookRepository;

/// Handle the init command. An existing workbook is never overwritten.
pub fn handle_init_command(
    paths: &BudgetPaths,
    settings: &Settings,
    year: Option<i32>,
) -> BudgetResult<()> {
    println!("Initializing MoneyMage at: {}", paths.base_dir().display());
    paths.ensure_directories()?;

    let mut settings = settings.clone();
    if year.is_some() {
        settings.budget_year = year;
    }
    settings.save(paths)?;

    let year = settings.year();
    let repo = WorkbookRepository::new(paths.budget_file(year));
    if repo.exists() {
        println!("Workbook already exists: {}", repo.path().display());
    } else {
        repo.save(&Workbook::template())?;
        println!("Created workbook: {}", repo.path().display());
    }

    println!();
    println!("Add one sheet per category to the workbook, list category types");
    println!("in the Categories sheet, and put transactions in:");
    println!("  {}", paths.transactions_file().display());
    println!("Then run 'moneymage update'.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_template_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        handle_init_command(&paths, &Settings::default(), Some(2031)).unwrap();
        let repo = WorkbookRepository::new(paths.budget_file(2031));
        assert_eq!(repo.load().unwrap(), Workbook::template());
        assert_eq!(Settings::load_or_create(&paths).unwrap().budget_year, Some(2031));

        let mut edited = Workbook::template();
        edited.set_sheet(crate::models::Sheet::new("Gifts"));
        repo.save(&edited).unwrap();
        handle_init_command(&paths, &Settings::default(), Some(2031)).unwrap();
        assert_eq!(repo.load().unwrap(), edited);
    }
}
