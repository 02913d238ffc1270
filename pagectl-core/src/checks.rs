//! The pagination check suite
//!
//! Six checks run in a fixed order against the products API, each worth a
//! fixed number of points, for a total of [`MAX_SCORE`]. The first check is a
//! gate: without enough data the remaining checks are skipped.
//!
//! Two checks award partial credit: an empty search result earns 1 of 2
//! points, and an unexpected status on the security check earns 0.5.

use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::client::{Endpoint, ProductsClient, Query};
use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::score::{CheckReport, Scoreboard, Verdict, MAX_SCORE};
use crate::shape::{self, PAGE_KEYS, SLICE_FORBIDDEN_KEYS, SLICE_MARKER_KEYS};

/// Minimum `totalElements` for the suite to continue past the gate
pub const MIN_DATASET: i64 = 5;

/// Page size used by the name-filter check
const SEARCH_PAGE_SIZE: u32 = 10;

/// Tunables for the suite
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub search_term: String,
    pub page_size: u32,
    pub sensitive_field: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckConfig::default().into()
    }
}

impl From<CheckConfig> for CheckOptions {
    fn from(config: CheckConfig) -> Self {
        Self {
            search_term: config.search_term,
            page_size: config.page_size,
            sensitive_field: config.sensitive_field,
        }
    }
}

/// Everything a suite run produced
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub base_url: String,
    pub score: f64,
    pub max_score: f64,
    pub data_available: bool,
    pub verdict: Verdict,
    pub checks: Vec<CheckReport>,
}

/// Run every check in order, calling `on_report` as each one finishes
#[instrument(skip_all, fields(base_url = %client.base_url()))]
pub async fn run_suite(
    client: &ProductsClient,
    options: &CheckOptions,
    mut on_report: impl FnMut(&CheckReport),
) -> SuiteReport {
    let mut board = Scoreboard::new();

    let (gate, data_available) = check_data_availability(client).await;
    on_report(board.record(gate));

    if data_available {
        let report = check_page_structure(client, options).await;
        on_report(board.record(report));
        let report = check_slice_structure(client, options).await;
        on_report(board.record(report));
        let report = check_filtering(client, options).await;
        on_report(board.record(report));
        let report = check_sorting(client, options).await;
        on_report(board.record(report));
        let report = check_security(client, options).await;
        on_report(board.record(report));
    } else {
        warn!("data availability gate failed; skipping remaining checks");
    }

    let score = board.score();
    SuiteReport {
        base_url: client.base_url().to_string(),
        score,
        max_score: MAX_SCORE,
        data_available,
        verdict: Verdict::from_score(score, MAX_SCORE),
        checks: board.into_reports(),
    }
}

/// GET and decode, turning every failure mode into report events
async fn fetch_json(
    client: &ProductsClient,
    endpoint: Endpoint,
    query: &Query,
    report: &mut CheckReport,
) -> Option<Value> {
    let body = client.get(endpoint, query).await.and_then(|response| {
        if !response.is_ok() {
            return Err(CheckError::unexpected_status(&response.url, response.status));
        }
        response.json()
    });

    match body {
        Ok(body) => Some(body),
        Err(err) if err.is_connection() => {
            report.connection_error(err.to_string());
            report.fail(format!("could not query the {endpoint} endpoint"));
            None
        }
        Err(err @ CheckError::UnexpectedStatus { .. }) => {
            report.fail(format!("error querying the {endpoint} endpoint: {err}"));
            None
        }
        Err(err) => {
            report.fail(err.to_string());
            None
        }
    }
}

/// (a) At least [`MIN_DATASET`] products must exist
pub async fn check_data_availability(client: &ProductsClient) -> (CheckReport, bool) {
    let mut report = CheckReport::new("Initial data check", 1.0);
    let query: Query = vec![("size", "1".to_string())];

    let Some(body) = fetch_json(client, Endpoint::Page, &query, &mut report).await else {
        return (report, false);
    };

    let total = shape::total_elements(&body);
    report.info(format!("Total products found: {total}"));
    if total >= MIN_DATASET {
        report.award(1.0, "Sufficient dataset detected");
        (report, true)
    } else {
        report.fail(format!(
            "At least {MIN_DATASET} products are needed. Run `pagectl seed` first."
        ));
        (report, false)
    }
}

/// (b) Page carries full metadata and honours `size`
pub async fn check_page_structure(client: &ProductsClient, options: &CheckOptions) -> CheckReport {
    let mut report = CheckReport::new("PAGE structure (full metadata)", 2.0);
    let size = options.page_size;
    let query: Query = vec![("page", "0".to_string()), ("size", size.to_string())];

    let Some(body) = fetch_json(client, Endpoint::Page, &query, &mut report).await else {
        return report;
    };

    let missing = shape::missing_keys(&body, &PAGE_KEYS);
    if !missing.is_empty() {
        report.fail(format!("Missing Page fields: {missing:?}"));
        return report;
    }
    report.award(1.0, "JSON carries all Page metadata");

    let returned = shape::content(&body).len();
    if returned == size as usize {
        report.award(1.0, format!("Page size respected (size={size})"));
    } else {
        report.fail(format!("Expected {size} items, got {returned}"));
    }
    report
}

/// (c) Slice omits counts and still marks its position
pub async fn check_slice_structure(client: &ProductsClient, options: &CheckOptions) -> CheckReport {
    let mut report = CheckReport::new("SLICE structure (performance)", 2.0);
    let query: Query = vec![
        ("page", "0".to_string()),
        ("size", options.page_size.to_string()),
    ];

    let Some(body) = fetch_json(client, Endpoint::Slice, &query, &mut report).await else {
        return report;
    };

    let forbidden = shape::present_keys(&body, &SLICE_FORBIDDEN_KEYS);
    if !forbidden.is_empty() {
        report.fail(format!(
            "Slice endpoint returned forbidden fields (is it a Page?): {forbidden:?}"
        ));
        return report;
    }
    report.award(1.0, "Slice carries no total counts (correct)");

    if shape::has_any_key(&body, &SLICE_MARKER_KEYS) {
        report.award(1.0, "Valid Slice structure");
    } else {
        report.fail("Does not look like a valid Slice object");
    }
    report
}

/// (d) `/search?name=` filters by name, case-insensitively
pub async fn check_filtering(client: &ProductsClient, options: &CheckOptions) -> CheckReport {
    let mut report = CheckReport::new("Filters + pagination (/search)", 2.0);
    let term = options.search_term.as_str();
    let query: Query = vec![
        ("name", term.to_string()),
        ("page", "0".to_string()),
        ("size", SEARCH_PAGE_SIZE.to_string()),
    ];

    let Some(body) = fetch_json(client, Endpoint::Search, &query, &mut report).await else {
        return report;
    };

    let Some(first) = shape::content(&body).first() else {
        report.warn(format!(
            "No '{term}' products found to validate the filter (no penalty, but check your data)"
        ));
        report.award(1.0, "Endpoint answers 200 OK (no data to validate the logic)");
        return report;
    };

    match shape::item_name(first) {
        Ok(name) if shape::name_matches(name, term) => {
            report.award(2.0, format!("Name filter '{term}' works correctly"));
        }
        Ok(name) => report.fail(format!("Product '{name}' does not contain '{term}'")),
        Err(err) => report.fail(err.to_string()),
    }
    report
}

/// (e) `sort=price,desc` puts the most expensive item first
pub async fn check_sorting(client: &ProductsClient, options: &CheckOptions) -> CheckReport {
    let mut report = CheckReport::new("Sorting (sort)", 2.0);
    let query: Query = vec![
        ("sort", "price,desc".to_string()),
        ("size", options.page_size.to_string()),
    ];

    let Some(body) = fetch_json(client, Endpoint::Page, &query, &mut report).await else {
        return report;
    };

    let items = shape::content(&body);
    if items.len() < 2 {
        report.fail("Not enough data to test sorting");
        return report;
    }

    let (p1, p2) = match (shape::item_price(&items[0]), shape::item_price(&items[1])) {
        (Ok(p1), Ok(p2)) => (p1, p2),
        (Err(err), _) | (_, Err(err)) => {
            report.fail(err.to_string());
            return report;
        }
    };

    report.info(format!("Price 1: ${p1} vs Price 2: ${p2}"));
    if p1 >= p2 {
        report.award(2.0, "DESC sorting correct (highest to lowest)");
    } else {
        report.fail("Sorting failed: the second price is higher than the first");
        return report;
    }

    // Only the first pair is scored; the rest of the page is informational
    match shape::first_descending_violation(items) {
        Ok(Some(i)) => report.warn(format!(
            "Order breaks further down the page: item {} is cheaper than item {}",
            i,
            i + 1
        )),
        Ok(None) => {}
        Err(err) => report.warn(err.to_string()),
    }
    report
}

/// (f) Sorting by a sensitive field must be rejected
pub async fn check_security(client: &ProductsClient, options: &CheckOptions) -> CheckReport {
    let mut report = CheckReport::new("Security (validation)", 1.0);
    let field = options.sensitive_field.as_str();
    let query: Query = vec![("sort", format!("{field},desc"))];

    match client.get(Endpoint::Page, &query).await {
        Ok(response) if matches!(response.status, 400 | 500) => {
            report.award(1.0, "Blocks sorting by invalid fields");
        }
        Ok(response) if response.status == 200 => {
            report.fail(format!("ALLOWED sorting by {field} (severe)"));
        }
        Ok(response) => {
            report.award(0.5, format!("Unexpected response: {}", response.status));
        }
        Err(err) => {
            report.connection_error(err.to_string());
            report.award(0.5, "Unexpected response: none");
        }
    }
    report
}
