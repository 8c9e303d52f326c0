//! Backup CLI commands
//!
//! Lists and prunes workbook archives.

use clap::Subcommand;

use crate::backup::BackupManager;
use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::BudgetResult;

/// Backup subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum BackupCommands {
    /// List workbook archives, newest first
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete archives beyond the configured retention
    Prune,
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &BudgetPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> BudgetResult<()> {
    let manager = BackupManager::new(paths, settings.archive_retention);

    match cmd {
        BackupCommands::List { verbose } => {
            let archives = manager.list_backups()?;

            if archives.is_empty() {
                println!("No archives found in {}", manager.archive_dir().display());
                return Ok(());
            }

            println!("Workbook Archives");
            println!("=================");
            for (i, archive) in archives.iter().enumerate() {
                if verbose {
                    println!(
                        "{}. {}\n   Workbook: {}\n   Created: {}\n   Size: {}",
                        i + 1,
                        archive.filename,
                        archive.workbook,
                        archive.created_at.format("%Y-%m-%d %H:%M:%S"),
                        format_size(archive.size_bytes),
                    );
                } else {
                    println!(
                        "  {}. {} ({})",
                        i + 1,
                        archive.filename,
                        format_size(archive.size_bytes)
                    );
                }
            }
            println!();
            println!("Total: {} archive(s)", archives.len());
        }

        BackupCommands::Prune => {
            if settings.archive_retention == 0 {
                println!("Archive retention is 0; keeping every archive.");
                return Ok(());
            }
            let deleted = manager.enforce_retention()?;
            if deleted.is_empty() {
                println!(
                    "Nothing to prune (keeping {} archive(s)).",
                    settings.archive_retention
                );
            } else {
                for path in &deleted {
                    println!("Deleted {}", path.display());
                }
                println!("Pruned {} archive(s).", deleted.len());
            }
        }
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
