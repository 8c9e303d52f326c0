use anyhow::Result;
use clap::{Parser, Subcommand};

use moneymage::cli::{
    handle_backup_command, handle_export_command, handle_init_command, handle_report_command,
    handle_update_command, BackupCommands, ExportArgs, ReportArgs, UpdateArgs,
};
use moneymage::config::{BudgetPaths, Settings};
use moneymage::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "moneymage",
    version,
    about = "Household budget workbook updater",
    long_about = "MoneyMage merges your actual transactions into per-category budget \
                  ledgers, applies each category's accrual rules, and projects cash \
                  flow and balances five years ahead."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive the workbook, run the budget and write the results back
    Update(UpdateArgs),

    /// Run the budget read-only and show one report
    Report(ReportArgs),

    /// Write the whole report to a JSON or YAML file
    Export(ExportArgs),

    /// Workbook archive commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Create the data directory and an empty workbook
    Init {
        /// Budget year of the new workbook
        #[arg(long)]
        year: Option<i32>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = BudgetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Update(args)) => handle_update_command(&paths, &settings, args)?,
        Some(Commands::Report(args)) => handle_report_command(&paths, &settings, args)?,
        Some(Commands::Export(args)) => handle_export_command(&paths, &settings, args)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Init { year }) => handle_init_command(&paths, &settings, year)?,
        Some(Commands::Config) => {
            println!("MoneyMage Configuration");
            println!("=======================");
            println!("Data directory:    {}", paths.base_dir().display());
            println!("Inputs directory:  {}", paths.inputs_dir().display());
            println!("Archive directory: {}", paths.archive_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Budget year:       {}", settings.year());
            println!("  Workbook:          {}", paths.budget_file(settings.year()).display());
            println!("  Transactions:      {}", paths.transactions_file().display());
            println!("  Archive retention: {}", settings.archive_retention);
            println!("  Tolerance:         {}", settings.out_of_balance_tolerance);
            println!("  Date format:       {}", settings.date_format);
            println!("  Priority:          {}", settings.priority_categories.join(", "));
        }
        None => {
            println!("MoneyMage - household budget workbook updater");
            println!();
            println!("Run 'moneymage --help' for usage information.");
            println!("Run 'moneymage init' to create an empty workbook.");
        }
    }

    Ok(())
}
