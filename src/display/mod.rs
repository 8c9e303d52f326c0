//! Display formatting for terminal output
//!
//! Renders budget runs as tables for the terminal.

pub mod report;

pub use report::{
    format_balances, format_projection, format_remaining, format_run_summary, format_summary,
};
