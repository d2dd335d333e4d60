//! DEX Screener HTTP client
//!
//! Read-only access to the public pairs API, keyed either by token mint
//! address or by a free-text search query.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::{entity::TradingPair, error::DexError};

/// Source of candidate trading pairs for a token
#[async_trait]
pub trait PairSource: Send + Sync {
    /// All pairs that trade the token with the given mint address
    async fn pairs_by_token(&self, address: &str) -> Result<Vec<TradingPair>, DexError>;

    /// Pairs matching a ticker, name or address query
    async fn search_pairs(&self, query: &str) -> Result<Vec<TradingPair>, DexError>;
}

#[derive(Debug, Clone)]
pub struct DexScreenerClient {
    http: Client,
    base_url: Url,
}

impl DexScreenerClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DexError> {
        let invalid = || DexError::InvalidConfig {
            name: "DEX_API_BASE_URL",
            value: base_url.to_string(),
        };

        let base_url = Url::parse(base_url).map_err(|_| invalid())?;
        if base_url.cannot_be_a_base() {
            return Err(invalid());
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch_pairs(&self, url: Url) -> Result<Vec<TradingPair>, DexError> {
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        parse_pairs(&body)
    }
}

#[async_trait]
impl PairSource for DexScreenerClient {
    async fn pairs_by_token(&self, address: &str) -> Result<Vec<TradingPair>, DexError> {
        let url = self.endpoint(&["latest", "dex", "tokens", address]);
        self.fetch_pairs(url).await
    }

    async fn search_pairs(&self, query: &str) -> Result<Vec<TradingPair>, DexError> {
        let mut url = self.endpoint(&["latest", "dex", "search"]);
        url.query_pairs_mut().append_pair("q", query);
        self.fetch_pairs(url).await
    }
}

/// Decode a `{"pairs": [...]}` response body.
///
/// A missing or null `pairs` yields an empty list and array elements that are
/// not objects are skipped. Only a body that is not JSON at all is an error.
pub fn parse_pairs(body: &[u8]) -> Result<Vec<TradingPair>, DexError> {
    let envelope: Value = serde_json::from_slice(body)?;

    let pairs = match envelope.get("pairs") {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| item.is_object())
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    };

    Ok(pairs)
}
