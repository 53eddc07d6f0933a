use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::OverpassConfig;
use crate::geometry::GeoBounds;

const USER_AGENT: &str = "coverage-map/0.1.0 (store coverage estimator)";

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single element from Overpass
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: u64,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Escape a value for use inside a double-quoted Overpass QL string
fn escape_ql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn build_named_node_query(bounds: &GeoBounds, name: &str, timeout_secs: u64) -> String {
    format!(
        r#"[out:json][timeout:{timeout}];
node["name"="{name}"]({bbox});
out body;"#,
        timeout = timeout_secs,
        name = escape_ql(name),
        bbox = bounds.to_overpass_bbox()
    )
}

/// Fetch every node tagged `name=<name>` inside a bounding box
///
/// The result still contains nodes that are inside the box but outside the
/// region; see `osm::parse_reference_points`.
pub fn fetch_named_nodes(
    bounds: &GeoBounds,
    name: &str,
    config: &OverpassConfig,
) -> Result<OverpassResponse> {
    // Leave the server 20s less than our client timeout
    let server_timeout = config.timeout_secs.saturating_sub(20).max(1);
    let query = build_named_node_query(bounds, name, server_timeout);
    execute_overpass_query(&query, config)
}

/// Execute an Overpass API query against each configured mirror, retrying
/// 429/504 responses with a linear back-off
fn execute_overpass_query(query: &str, config: &OverpassConfig) -> Result<OverpassResponse> {
    if config.urls.is_empty() {
        bail!("No Overpass API mirrors configured");
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let max_retries = config.max_retries.max(1);
    let mut last_error = None;

    for url in &config.urls {
        for attempt in 0..max_retries {
            if attempt > 0 {
                let wait_secs = 30 * u64::from(attempt);
                eprintln!(
                    "Overpass API busy at {}, retrying in {} seconds (attempt {}/{})",
                    url,
                    wait_secs,
                    attempt + 1,
                    max_retries
                );
                std::thread::sleep(Duration::from_secs(wait_secs));
            }

            // Overpass expects form-encoded POST data: data=<query>
            let response = match client.post(url).form(&[("data", query)]).send() {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(format!("{url}: {e}"));
                    break;
                }
            };

            match response.status().as_u16() {
                200 => {
                    return response
                        .json()
                        .context("Failed to parse Overpass JSON response");
                }
                429 | 504 => {
                    last_error = Some(format!(
                        "{} returned status {} (attempt {})",
                        url,
                        response.status(),
                        attempt + 1
                    ));
                }
                status => {
                    last_error = Some(format!("{url} returned error status: {status}"));
                    break;
                }
            }
        }
    }

    Err(anyhow!(
        "Overpass API failed on all {} mirrors: {}",
        config.urls.len(),
        last_error.unwrap_or_else(|| "Unknown error".to_string())
    ))
}
