//! Minimal Pinterest search client.
//!
//! Issues a single unauthenticated GET against the public web search resource and
//! maps the first page of results to [`Pin`]s. No login, no bookmarks/pagination.

use super::{pins_from_raw, Pin, RawPin, SearchError};
use crate::fetch::FetchOptions;
use serde::Deserialize;

const SEARCH_ENDPOINT: &str = "https://www.pinterest.com/resource/BaseSearchResource/get/";

/// Largest page the endpoint serves in one response.
const MAX_PAGE_SIZE: usize = 250;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    resource_response: ResourceResponse,
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    #[serde(default)]
    data: Option<ResourceData>,
}

#[derive(Debug, Deserialize)]
struct ResourceData {
    #[serde(default)]
    results: Vec<RawPin>,
}

/// Pinterest search over libcurl, sharing the fetcher's proxy and timeouts.
#[derive(Debug, Clone)]
pub struct PinterestClient {
    endpoint: String,
    options: FetchOptions,
}

impl PinterestClient {
    pub fn new(options: FetchOptions) -> Self {
        Self {
            endpoint: SEARCH_ENDPOINT.to_string(),
            options,
        }
    }

    /// Point the client at another endpoint (a mirror or a local test server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builds the request URL for `term`, asking for up to `limit` results.
    pub fn search_url(&self, term: &str, limit: usize) -> Result<url::Url, SearchError> {
        let source_url = format!("/search/pins/?q={term}&rs=typed");
        let data = serde_json::json!({
            "options": {
                "query": term,
                "scope": "pins",
                "rs": "typed",
                "page_size": limit.clamp(1, MAX_PAGE_SIZE),
                "redux_normalize_feed": true,
                "source_url": source_url,
            },
            "context": {},
        });
        let url = url::Url::parse_with_params(
            &self.endpoint,
            &[
                ("source_url", source_url.as_str()),
                ("data", data.to_string().as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Searches for `term` and returns at most `limit` pins that carry an image URL.
    pub fn search(&self, term: &str, limit: usize) -> Result<Vec<Pin>, SearchError> {
        let url = self.search_url(term, limit)?;
        tracing::debug!(%url, "searching");

        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.options.read_timeout)?;
        easy.useragent(&self.options.user_agent)?;
        easy.accept_encoding("")?;
        if let Some(proxy) = &self.options.proxy {
            easy.proxy(proxy)?;
        }

        let mut headers = curl::easy::List::new();
        headers.append("Accept: application/json, text/javascript, */*; q=0.01")?;
        headers.append("X-Requested-With: XMLHttpRequest")?;
        headers.append("X-Pinterest-AppState: active")?;
        easy.http_headers(headers)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(SearchError::Http(code));
        }

        let mut pins = parse_search_response(&body)?;
        pins.truncate(limit);
        tracing::info!(term, found = pins.len(), "search finished");
        Ok(pins)
    }
}

/// Parses a `BaseSearchResource` response body.
pub fn parse_search_response(body: &[u8]) -> Result<Vec<Pin>, SearchError> {
    let envelope: SearchEnvelope = serde_json::from_slice(body).map_err(SearchError::Parse)?;
    let results = envelope
        .resource_response
        .data
        .map(|d| d.results)
        .unwrap_or_default();
    Ok(pins_from_raw(results))
}
