//! Page vs Slice latency comparison
//!
//! Purely observational: sequential GETs against both variants, mean
//! round-trip time per variant, and the relative difference.

use serde::Serialize;
use tracing::{info, instrument};

use crate::client::{Endpoint, ProductsClient, Query};

/// One timed request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sample {
    Ok { ms: f64 },
    Status { status: u16 },
    Unreachable,
}

/// Timings collected for one endpoint variant
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub label: String,
    pub endpoint: Endpoint,
    pub iterations: usize,
    /// Round-trip times of successful (200) calls, in milliseconds
    pub samples_ms: Vec<f64>,
    /// Statuses of non-200 calls, in order
    pub error_statuses: Vec<u16>,
    pub unreachable: usize,
}

impl Measurement {
    fn new(label: impl Into<String>, endpoint: Endpoint, iterations: usize) -> Self {
        Self {
            label: label.into(),
            endpoint,
            iterations,
            samples_ms: Vec::with_capacity(iterations),
            error_statuses: Vec::new(),
            unreachable: 0,
        }
    }

    fn push(&mut self, sample: Sample) {
        match sample {
            Sample::Ok { ms } => self.samples_ms.push(ms),
            Sample::Status { status } => self.error_statuses.push(status),
            Sample::Unreachable => self.unreachable += 1,
        }
    }

    /// Arithmetic mean of successful calls; `None` when none succeeded
    pub fn mean_ms(&self) -> Option<f64> {
        if self.samples_ms.is_empty() {
            return None;
        }
        Some(self.samples_ms.iter().sum::<f64>() / self.samples_ms.len() as f64)
    }
}

/// Page vs Slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub page_ms: f64,
    pub slice_ms: f64,
    pub diff_ms: f64,
    /// `(page - slice) / page * 100`
    pub improvement_pct: f64,
    pub slice_faster: bool,
}

/// Compare two measurements; `None` if either has no successful call
pub fn compare(page: &Measurement, slice: &Measurement) -> Option<Comparison> {
    let page_ms = page.mean_ms()?;
    let slice_ms = slice.mean_ms()?;
    let diff_ms = page_ms - slice_ms;
    let improvement_pct = if page_ms > 0.0 {
        diff_ms / page_ms * 100.0
    } else {
        0.0
    };
    Some(Comparison {
        page_ms,
        slice_ms,
        diff_ms,
        improvement_pct,
        slice_faster: slice_ms < page_ms,
    })
}

/// Full comparison output
#[derive(Debug, Clone, Serialize)]
pub struct PerfReport {
    pub base_url: String,
    pub page_size: u32,
    pub page: Measurement,
    pub slice: Measurement,
    pub comparison: Option<Comparison>,
}

/// Time `iterations` sequential GETs against one endpoint
pub async fn measure_endpoint(
    client: &ProductsClient,
    label: &str,
    endpoint: Endpoint,
    query: &Query,
    iterations: usize,
    mut on_sample: impl FnMut(&Sample),
) -> Measurement {
    let mut measurement = Measurement::new(label, endpoint, iterations);

    for _ in 0..iterations {
        let sample = match client.safe_get(endpoint, query).await {
            Some(response) if response.is_ok() => Sample::Ok {
                ms: response.elapsed_ms(),
            },
            Some(response) => Sample::Status {
                status: response.status,
            },
            None => Sample::Unreachable,
        };
        on_sample(&sample);
        measurement.push(sample);
    }

    if let Some(mean) = measurement.mean_ms() {
        info!(label, mean_ms = mean, ok = measurement.samples_ms.len(), "measured");
    }
    measurement
}

const PAGE_LABEL: &str = "PAGE (full)";
const SLICE_LABEL: &str = "SLICE (light)";

/// Progress of a running comparison
#[derive(Debug, Clone, Copy)]
pub enum PerfEvent<'a> {
    /// A variant is about to be measured
    Started {
        endpoint: Endpoint,
        label: &'a str,
        iterations: usize,
    },
    /// One request of a variant completed
    Sampled {
        endpoint: Endpoint,
        sample: &'a Sample,
    },
    /// All requests of a variant completed
    Finished { measurement: &'a Measurement },
}

/// Measure the Page variant, then the Slice variant, then compare
#[instrument(skip_all, fields(base_url = %client.base_url(), iterations = iterations, page_size = page_size))]
pub async fn run_comparison(
    client: &ProductsClient,
    iterations: usize,
    page_size: u32,
    mut on_event: impl FnMut(PerfEvent<'_>),
) -> PerfReport {
    let query: Query = vec![("page", "0".to_string()), ("size", page_size.to_string())];
    let page = measure_variant(client, Endpoint::Page, PAGE_LABEL, &query, iterations, &mut on_event).await;
    let slice =
        measure_variant(client, Endpoint::Slice, SLICE_LABEL, &query, iterations, &mut on_event).await;

    let comparison = compare(&page, &slice);
    PerfReport {
        base_url: client.base_url().to_string(),
        page_size,
        page,
        slice,
        comparison,
    }
}

async fn measure_variant<F>(
    client: &ProductsClient,
    endpoint: Endpoint,
    label: &str,
    query: &Query,
    iterations: usize,
    on_event: &mut F,
) -> Measurement
where
    F: FnMut(PerfEvent<'_>),
{
    on_event(PerfEvent::Started {
        endpoint,
        label,
        iterations,
    });
    let measurement = measure_endpoint(client, label, endpoint, query, iterations, |sample| {
        on_event(PerfEvent::Sampled { endpoint, sample })
    })
    .await;
    on_event(PerfEvent::Finished {
        measurement: &measurement,
    });
    measurement
}
