use anyhow::{Context, Result};
use clap::Args;
use pagectl_core::{perf, Measurement, PagectlConfig, PerfEvent, PerfReport, ProductsClient, Sample};

use super::OutputFormat;
use crate::ui;

#[derive(Args, Debug)]
pub struct PerfArgs {
    /// Products collection endpoint (overrides api.base_url)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Requests per variant
    #[arg(long, short = 'n')]
    pub iterations: Option<usize>,

    /// Page size requested from both variants
    #[arg(long)]
    pub size: Option<u32>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn run_perf(args: PerfArgs, mut config: PagectlConfig) -> Result<()> {
    if let Some(url) = args.base_url {
        config.api.base_url = url;
    }
    if let Some(n) = args.iterations {
        config.perf.iterations = n;
    }
    if let Some(size) = args.size {
        config.perf.page_size = size;
    }
    config.validate().context("Invalid configuration")?;

    let client = ProductsClient::new(&config.api.base_url, config.api.timeout())
        .context("Failed to build HTTP client")?;
    let iterations = config.perf.iterations;
    let text = args.format == OutputFormat::Text;

    if text {
        println!("🚀 STARTING PERFORMANCE TEST - PAGE VS SLICE");
        println!("{}", "-".repeat(50));
    }

    let pb = ui::progress_bar(iterations as u64 * 2, "Measuring PAGE");
    let report = perf::run_comparison(&client, iterations, config.perf.page_size, |event| {
        match event {
            PerfEvent::Started {
                endpoint,
                label,
                iterations,
            } => {
                pb.set_message(format!("Measuring {endpoint}"));
                if text {
                    ui::println(&pb, format!("🔄 Testing {label} ({iterations} requests)..."));
                }
            }
            PerfEvent::Sampled { sample, .. } => {
                if text {
                    match sample {
                        Sample::Status { status } => ui::println(&pb, format!("   ❌ Error {status}")),
                        Sample::Unreachable => ui::println(&pb, "   ❌ Server unreachable"),
                        Sample::Ok { .. } => {}
                    }
                }
                pb.inc(1);
            }
            PerfEvent::Finished { measurement } => {
                if text {
                    ui::println(&pb, measurement_summary(measurement));
                }
            }
        }
    })
    .await;
    pb.finish_and_clear();

    match args.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }
    Ok(())
}

fn measurement_summary(m: &Measurement) -> String {
    let mut lines = vec![match m.mean_ms() {
        Some(mean) => format!("   ⏱️ Average time: {mean:.2} ms"),
        None => "   ❌ No successful responses".to_string(),
    }];
    if !m.error_statuses.is_empty() {
        lines.push(format!(
            "   ❌ {} error responses: {:?}",
            m.error_statuses.len(),
            m.error_statuses
        ));
    }
    if m.unreachable > 0 {
        lines.push(format!("   ❌ {} requests never reached the server", m.unreachable));
    }
    lines.join("\n")
}

fn print_report(report: &PerfReport) {
    println!("{}", "-".repeat(50));
    println!("📊 FINAL RESULTS:");
    let Some(cmp) = report.comparison else {
        println!("⚠️ Cannot compare: one of the variants had no successful responses.");
        return;
    };
    println!("PAGE:  {:.2} ms", cmp.page_ms);
    println!("SLICE: {:.2} ms", cmp.slice_ms);
    if cmp.slice_faster {
        println!("✅ SLICE is {:.1}% faster than PAGE.", cmp.improvement_pct);
    } else {
        println!("⚠️ Similar times (the dataset might still be small).");
    }
}
