//! HTTP client for the products API under test
//!
//! Thin wrapper over `reqwest` that knows the three endpoint variants and
//! records the wall-clock time of every call, body download included.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CheckError, Result};

/// Endpoint variants exposed by the products API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// `{base}`: full `Page` with total counts
    Page,
    /// `{base}/slice`: `Slice` without total counts
    Slice,
    /// `{base}/search`: filtered `Page`
    Search,
}

impl Endpoint {
    fn suffix(self) -> &'static str {
        match self {
            Endpoint::Page => "",
            Endpoint::Slice => "/slice",
            Endpoint::Search => "/search",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Page => f.write_str("PAGE"),
            Endpoint::Slice => f.write_str("SLICE"),
            Endpoint::Search => f.write_str("SEARCH"),
        }
    }
}

/// Query string pairs, in request order
pub type Query = Vec<(&'static str, String)>;

/// Raw response plus timing
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status: u16,
    pub elapsed: Duration,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).map_err(|source| CheckError::Decode {
            url: self.url.clone(),
            source,
        })
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Client bound to one products base URL
#[derive(Debug, Clone)]
pub struct ProductsClient {
    client: Client,
    base_url: String,
}

impl ProductsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckError::config(format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.suffix())
    }

    /// Issue one GET and read the full body
    pub async fn get(&self, endpoint: Endpoint, query: &[(&'static str, String)]) -> Result<ApiResponse> {
        let url = self.url(endpoint);
        debug!(%url, ?query, "GET");

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| CheckError::connection(&url, e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| CheckError::connection(&url, e))?
            .to_vec();
        let elapsed = started.elapsed();

        debug!(%url, status, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "response");
        Ok(ApiResponse {
            url,
            status,
            elapsed,
            body,
        })
    }

    /// Like [`get`](Self::get) but logs connection failures and yields `None`
    pub async fn safe_get(
        &self,
        endpoint: Endpoint,
        query: &[(&'static str, String)],
    ) -> Option<ApiResponse> {
        match self.get(endpoint, query).await {
            Ok(response) => Some(response),
            Err(err) => {
                warn!(error = %err, "request failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls() {
        let client =
            ProductsClient::new("http://localhost:8080/api/products/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(Endpoint::Page), "http://localhost:8080/api/products");
        assert_eq!(client.url(Endpoint::Slice), "http://localhost:8080/api/products/slice");
        assert_eq!(client.url(Endpoint::Search), "http://localhost:8080/api/products/search");
    }

    #[test]
    fn json_decode_failure_carries_url() {
        let response = ApiResponse {
            url: "http://localhost/api/products".to_string(),
            status: 200,
            elapsed: Duration::from_millis(3),
            body: b"<html>oops</html>".to_vec(),
        };
        let err = response.json().unwrap_err();
        assert!(matches!(err, CheckError::Decode { .. }));
        assert!(err.to_string().contains("http://localhost/api/products"));
        assert_eq!(response.elapsed_ms(), 3.0);
    }
}
