//! Command implementations for the pagectl CLI

pub mod check;
pub mod config;
pub mod perf;

use clap::ValueEnum;

pub use check::run_check;
pub use config::run_config;
pub use perf::run_perf;

/// Report format shared by `check` and `perf`
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// JSON for machine consumption
    Json,
}

pub(crate) fn rule(ch: char) -> String {
    ch.to_string().repeat(60)
}
