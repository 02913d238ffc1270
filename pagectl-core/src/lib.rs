//! pagectl-core - check suite and latency comparison for paginated products APIs
//!
//! This crate provides:
//! - Layered configuration (defaults, TOML files, `.env`, environment)
//! - An HTTP client for the `{base}`, `{base}/slice` and `{base}/search` endpoints
//! - Shape inspection for Spring-style `Page` and `Slice` JSON bodies
//! - The scored check suite and the Page vs Slice latency comparison
//!
//! ## Architecture
//!
//! ```text
//! PagectlConfig → ProductsClient → checks::run_suite → SuiteReport
//!                               ↘ perf::run_comparison → PerfReport
//! ```

pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod perf;
pub mod score;
pub mod shape;

pub use checks::{run_suite, CheckOptions, SuiteReport};
pub use client::{ApiResponse, Endpoint, ProductsClient, Query};
pub use config::PagectlConfig;
pub use error::{CheckError, Result};
pub use perf::{run_comparison, Comparison, Measurement, PerfEvent, PerfReport, Sample};
pub use score::{CheckReport, Event, Scoreboard, Verdict, MAX_SCORE};
