//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod backup;
pub mod export;
pub mod init;
pub mod report;
pub mod update;

pub use backup::{handle_backup_command, BackupCommands};
pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use init::handle_init_command;
pub use report::{handle_report_command, OutputFormat, ReportArgs, ReportKind};
pub use update::{handle_update_command, InputArgs, UpdateArgs};
