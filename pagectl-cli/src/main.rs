//! pagectl CLI - validation tooling for a paginated products API
//!
//! Three tools behind one binary:
//! - `check`: scored conformance suite for the Page, Slice, search and sort endpoints
//! - `perf`: Page vs Slice latency comparison
//! - `seed`: truncate and refill the PostgreSQL store with synthetic data

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pagectl_core::config::{self, PagectlConfig};
use tracing::debug;

mod commands;
mod tracing_setup;
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "pagectl",
    author,
    version,
    about = "Validation tooling for a paginated products API",
    long_about = "Check Page/Slice/search/sort behaviour of a products API, compare Page and \
                  Slice latency, and seed its PostgreSQL store with synthetic data."
)]
struct Cli {
    /// Suppress progress spinners and bars
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scored pagination check suite
    Check(commands::check::CheckArgs),
    /// Compare Page and Slice response times
    Perf(commands::perf::PerfArgs),
    /// Truncate and refill the database with synthetic users, categories and products
    Seed(pagectl_seed::SeedArgs),
    /// Inspect the effective configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_setup::init(cli.debug).ok();

    ui::init_quiet_mode(cli.quiet);

    config::load_dotenv()?;
    let cfg = PagectlConfig::load();
    debug!(base_url = %cfg.api.base_url, "configuration loaded");

    match cli.command {
        Commands::Check(args) => commands::run_check(args, cfg).await,
        Commands::Perf(args) => commands::run_perf(args, cfg).await,
        Commands::Seed(args) => run_seed(args, cfg).await,
        Commands::Config(args) => commands::run_config(args, &cfg),
        Commands::Completions(args) => run_completions(args),
    }
}

async fn run_seed(args: pagectl_seed::SeedArgs, cfg: PagectlConfig) -> Result<()> {
    let products = args.products.unwrap_or(cfg.seed.products);
    let pb = ui::progress_bar(products as u64, "📦 products");
    pagectl_seed::run_seed(args, &cfg, &pb)
        .await
        .context("pagectl seed failed")
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
