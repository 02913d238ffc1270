use anyhow::{Context, Result};
use clap::Args;
use pagectl_core::checks::{self, CheckOptions, SuiteReport};
use pagectl_core::{CheckReport, Event, PagectlConfig, ProductsClient};
use tracing::debug;

use super::{rule, OutputFormat};
use crate::ui;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Products collection endpoint (overrides api.base_url)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Name fragment used by the filtering check
    #[arg(long, value_name = "T")]
    pub term: Option<String>,

    /// Page size used by the page, slice and sort checks
    #[arg(long)]
    pub page_size: Option<u32>,
}

pub async fn run_check(args: CheckArgs, mut config: PagectlConfig) -> Result<()> {
    if let Some(url) = args.base_url {
        config.api.base_url = url;
    }
    if let Some(term) = args.term {
        config.check.search_term = term;
    }
    if let Some(size) = args.page_size {
        config.check.page_size = size;
    }
    config.validate().context("Invalid configuration")?;

    let client = ProductsClient::new(&config.api.base_url, config.api.timeout())
        .context("Failed to build HTTP client")?;
    let options = CheckOptions::from(config.check.clone());
    debug!(?options, "running check suite");

    let text = args.format == OutputFormat::Text;
    if text {
        println!("\nSTARTING PAGINATION VALIDATION");
        println!("Base endpoint: {}", client.base_url());
    }

    let pb = ui::spinner("Running checks...");
    let report = checks::run_suite(&client, &options, |check| {
        if text {
            pb.suspend(|| print_check(check));
        } else {
            pb.set_message(format!("Finished: {}", check.title));
        }
    })
    .await;
    if report.data_available {
        ui::finish(pb, true, format!("{} checks run", report.checks.len()));
    } else {
        ui::finish(pb, false, "not enough data, remaining checks skipped");
    }

    match args.format {
        OutputFormat::Text => print_summary(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }
    Ok(())
}

fn print_check(check: &CheckReport) {
    println!("\n{}", rule('='));
    println!("[TEST] {} ({} pts)", check.title, check.available);
    println!("{}", rule('-'));
    for event in &check.events {
        match event {
            Event::Pass { points, message } => println!("  ✅ +{points} pts: {message}"),
            Event::Fail { message } => println!("  ❌ FAIL: {message}"),
            Event::Warn { message } => println!("  ⚠️ {message}"),
            Event::Info { message } => println!("  ℹ️ {message}"),
            Event::ConnectionError { message } => println!("  [CONNECTION ERROR]: {message}"),
        }
    }
}

fn print_summary(report: &SuiteReport) {
    println!("\n{}", rule('='));
    println!("FINAL RESULT");
    println!("{}", rule('='));
    println!("SCORE: {} / {}", report.score, report.max_score);
    println!("{}", report.verdict.message());
}
