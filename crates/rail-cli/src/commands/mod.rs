use std::process::ExitCode;

use rail_core::MigrationSummary;

pub mod config;
pub mod dispatch;
pub mod entities;
pub mod export;
pub mod import;

/// Bad configuration, unreadable input, or any other error before a run.
pub const EXIT_FATAL: u8 = 1;

/// The run finished but some records or steps failed.
pub const EXIT_PARTIAL: u8 = 2;

#[must_use]
pub fn exit_code(summary: &MigrationSummary) -> ExitCode {
    if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_PARTIAL)
    }
}
