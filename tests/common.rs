//! Common test utilities and constants
//!
//! Shared functionality used across all test modules.

use pingrab::prelude::*;
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Address nothing listens on; requests fail at the transport level.
#[allow(dead_code)]
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9/unreachable.jpg";

/// Builds a validated config with the given keyword, folder and limit.
#[allow(dead_code)]
pub fn cycle_config(keyword: &str, dir: &Path, limit: usize) -> CycleConfig {
    CycleConfigBuilder::default()
        .keyword(keyword)
        .destination_dir(dir)
        .limit(limit)
        .build()
        .unwrap()
}

/// Mounts an image of `size` bytes at `route` and returns its full URL.
#[allow(dead_code)]
pub async fn mount_image(server: &MockServer, route: &str, size: usize) -> String {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xAB; size]))
        .mount(server)
        .await;
    format!("{}{}", server.uri(), route)
}

/// Mounts a Pinterest-shaped search response listing `urls` in order.
#[allow(dead_code)]
pub async fn mount_search(server: &MockServer, urls: &[String]) {
    let results: Vec<_> = urls
        .iter()
        .map(|url| json!({"id": url, "images": {"orig": {"url": url, "width": 800}}}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/resource/BaseSearchResource/get/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resource_response": {"status": "success", "data": {"results": results}}
        })))
        .mount(server)
        .await;
}

/// Counts files directly inside `dir`.
#[allow(dead_code)]
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
