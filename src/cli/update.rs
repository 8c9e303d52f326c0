//! Update command
//!
//! Archives the workbook, runs the pipeline and writes the annotated
//! workbook back.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use tracing::info;

use crate::backup::BackupManager;
use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::display::format_run_summary;
use crate::error::BudgetResult;
use crate::export::render_workbook;
use crate::models::Workbook;
use crate::services::{BudgetReport, BudgetUpdater};
use crate::storage::Storage;

/// Where the inputs of a run come from
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Budget workbook (default: inputs/Budget_<year>.json)
    #[arg(long)]
    pub budget: Option<PathBuf>,

    /// Transactions CSV (default: inputs/transactions.csv)
    #[arg(long)]
    pub transactions: Option<PathBuf>,

    /// Budget year (default: settings, then the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Date treated as today, YYYY-MM-DD
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

impl InputArgs {
    pub fn year(&self, settings: &Settings) -> i32 {
        self.year.unwrap_or_else(|| settings.year())
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Storage for these inputs, falling back to the default file locations
    pub fn storage(&self, paths: &BudgetPaths, settings: &Settings) -> BudgetResult<Storage> {
        let year = self.year(settings);
        Storage::with_files(
            paths.clone(),
            self.budget.clone().unwrap_or_else(|| paths.budget_file(year)),
            self.transactions
                .clone()
                .unwrap_or_else(|| paths.transactions_file()),
        )
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Overwrite the workbook without archiving it first
    #[arg(long)]
    pub no_backup: bool,
}

/// Load the inputs and run the pipeline without writing anything
pub fn run_pipeline(
    storage: &Storage,
    settings: &Settings,
    input: &InputArgs,
) -> BudgetResult<(Workbook, BudgetReport)> {
    let workbook = storage.workbook.load()?;
    let transactions = storage.transactions.load()?;
    let report = BudgetUpdater::new(settings).run(
        &workbook,
        transactions.as_deref(),
        input.year(settings),
        input.as_of(),
    )?;
    Ok((workbook, report))
}

/// Handle the update command
pub fn handle_update_command(
    paths: &BudgetPaths,
    settings: &Settings,
    args: UpdateArgs,
) -> BudgetResult<()> {
    let storage = args.input.storage(paths, settings)?;
    let (workbook, report) = run_pipeline(&storage, settings, &args.input)?;

    if !args.no_backup {
        let manager = BackupManager::new(paths, settings.archive_retention);
        let (archive, pruned) = manager.create_backup_with_retention(storage.workbook.path())?;
        println!("Archived workbook to {}", archive.display());
        if !pruned.is_empty() {
            println!("Pruned {} old archive(s)", pruned.len());
        }
    }

    let updated = render_workbook(&workbook, &report, settings);
    storage.workbook.save(&updated)?;
    info!(path = %storage.workbook.path().display(), "Workbook updated");

    print!("{}", format_run_summary(&report));
    println!("Updated {}", storage.workbook.path().display());
    Ok(())
}
