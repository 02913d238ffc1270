//! Diagnostics subscriber for the pagectl CLI
//!
//! Reports (✅/❌ lines, scores, timings) go to stdout; everything logged
//! through `tracing` goes to stderr so `--format json` output stays parseable.
//!
//!   pagectl --debug check                      # debug level, with targets
//!   RUST_LOG=pagectl_core=trace pagectl perf   # explicit filter wins over --debug

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Level used when RUST_LOG is unset
fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Install the global fmt subscriber; errors if one is already installed
pub fn init(debug: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
