use std::{env, time::Duration};

pub mod client;
pub mod entity;
mod error;

// Re-export commonly used types
pub use client::{parse_pairs, DexScreenerClient, PairSource};
pub use entity::TradingPair;
pub use error::DexError;

mod defaults {
    pub const DEX_API_BASE_URL: &str = "https://api.dexscreener.com";
    pub const DEX_TIMEOUT_SECS: &str = "10";
}

/// Build the DEX Screener client from `DEX_API_BASE_URL` and `DEX_TIMEOUT_SECS`.
pub fn initialize_client() -> Result<DexScreenerClient, DexError> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let base_url =
        env::var("DEX_API_BASE_URL").unwrap_or(String::from(defaults::DEX_API_BASE_URL));

    let timeout_env =
        env::var("DEX_TIMEOUT_SECS").unwrap_or(String::from(defaults::DEX_TIMEOUT_SECS));

    DexScreenerClient::new(&base_url, parse_timeout(&timeout_env)?)
}

/// Whole seconds, at least one; a zero timeout would fail every request
fn parse_timeout(value: &str) -> Result<Duration, DexError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(DexError::InvalidConfig {
            name: "DEX_TIMEOUT_SECS",
            value: value.to_string(),
        }),
    }
}
