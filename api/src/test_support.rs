//! In-memory pair source for handler tests

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use dexscreener::{DexError, PairSource, TradingPair};

/// Serves canned pairs; unknown tokens and queries have no pairs
#[derive(Default)]
pub struct FakeSource {
    tokens: HashMap<String, Vec<TradingPair>>,
    searches: HashMap<String, Vec<TradingPair>>,
    failing: HashSet<String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, address: &str, pairs: Vec<TradingPair>) -> Self {
        self.tokens.insert(address.to_string(), pairs);
        self
    }

    pub fn with_search(mut self, query: &str, pairs: Vec<TradingPair>) -> Self {
        self.searches.insert(query.to_string(), pairs);
        self
    }

    /// Lookups for `key` fail as if the upstream returned garbage
    pub fn with_failure(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    fn lookup(
        &self,
        table: &HashMap<String, Vec<TradingPair>>,
        key: &str,
    ) -> Result<Vec<TradingPair>, DexError> {
        if self.failing.contains(key) {
            return Err(dexscreener::parse_pairs(b"502 Bad Gateway").unwrap_err());
        }
        Ok(table.get(key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl PairSource for FakeSource {
    async fn pairs_by_token(&self, address: &str) -> Result<Vec<TradingPair>, DexError> {
        self.lookup(&self.tokens, address)
    }

    async fn search_pairs(&self, query: &str) -> Result<Vec<TradingPair>, DexError> {
        self.lookup(&self.searches, query)
    }
}
