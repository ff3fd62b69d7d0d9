use crate::{
    error::{Error, Result},
    net::{HttpClient, json},
    query::QueryClient,
    types::AssetDescriptor,
};
use async_trait::async_trait;
use serde_json::Value;

const PINTEREST_BASE_URL: &str = "https://www.pinterest.com";
const SEARCH_RESOURCE_PATH: &str = "/resource/BaseSearchResource/get/";
const JSON_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// Pinterest pin search backed by the site's internal resource API.
///
/// The endpoint is the one the web app calls while rendering a search page.
/// It answers with a JSON envelope whose `resource_response.data.results`
/// array holds pins in ranking order; each pin carries an `images` map of
/// renditions keyed by size (`orig`, `736x`, `474x`, ...).
///
/// # Examples
///
/// ```rust,no_run
/// use pingrab::prelude::*;
/// use pingrab::providers::PinterestClient;
///
/// # async fn example() -> pingrab::Result<()> {
/// let client = PinterestClient::new();
/// let assets = client.search("mountain lake").await?;
/// println!("{} pins", assets.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PinterestClient {
    base_url: String,
    client: HttpClient,
}

impl Default for PinterestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PinterestClient {
    pub fn new() -> Self {
        Self::with_base_url(PINTEREST_BASE_URL)
    }

    /// Points the client at another host, e.g. a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = HttpClient::new("pinterest")
            .with_referer(&format!("{}/", base_url))
            .with_header("Accept", JSON_ACCEPT)
            .with_header("X-Requested-With", "XMLHttpRequest")
            .with_header("X-Pinterest-PWS-Handler", "www/search/[scope].js");

        Self { base_url, client }
    }

    /// Builds the resource API URL for a keyword.
    pub fn search_url(&self, keyword: &str) -> String {
        let source_url = format!("/search/pins/?q={}", keyword);
        let data = serde_json::json!({
            "options": {
                "isPrefetch": false,
                "query": keyword,
                "scope": "pins",
                "no_fetch_context_on_resource": false,
            },
            "context": {},
        });

        format!(
            "{}{}?source_url={}&data={}",
            self.base_url,
            SEARCH_RESOURCE_PATH,
            urlencoding::encode(&source_url),
            urlencoding::encode(&data.to_string()),
        )
    }

    /// Extracts pin image URLs from a resource API response.
    ///
    /// Pins without any image rendition (ads, boards, stories) are skipped.
    fn parse_results(&self, response: &Value) -> Result<Vec<AssetDescriptor>> {
        let data = json::require(response, "resource_response.data")
            .map_err(|e| Error::provider(self.id(), e.to_string()))?;

        let assets = json::lookup_array(data, "results")
            .iter()
            .filter_map(best_image_url)
            .map(AssetDescriptor::new)
            .collect();

        Ok(assets)
    }
}

/// Picks the original rendition of a pin, or the widest one available.
fn best_image_url(pin: &Value) -> Option<&str> {
    if let Some(url) = json::lookup_str(pin, "images.orig.url") {
        return Some(url);
    }

    pin.get("images")?
        .as_object()?
        .values()
        .filter_map(|image| {
            let url = image.get("url")?.as_str()?;
            let width = image.get("width").and_then(Value::as_u64).unwrap_or(0);
            Some((width, url))
        })
        .max_by_key(|(width, _)| *width)
        .map(|(_, url)| url)
}

#[async_trait]
impl QueryClient for PinterestClient {
    fn id(&self) -> &'static str {
        "pinterest"
    }

    async fn search(&self, keyword: &str) -> Result<Vec<AssetDescriptor>> {
        let url = self.search_url(keyword);
        tracing::debug!(provider = self.id(), keyword, "Querying search resource");

        let response: Value = self
            .client
            .get_json(&url)
            .await
            .map_err(|e| Error::provider(self.id(), e.to_string()))?;

        let assets = self.parse_results(&response)?;
        tracing::debug!(provider = self.id(), found = assets.len(), "Search finished");
        Ok(assets)
    }
}
