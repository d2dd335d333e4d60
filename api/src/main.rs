//! Meme Scout API Server
//!
//! Scores tokens for the browser extension from live DEX Screener pair data.

use std::{env, net::SocketAddr, sync::Arc};

use axum::{routing::get, Json, Router};
use chrono::Utc;
use dexscreener::PairSource;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod routes;
pub mod scoring;
#[cfg(test)]
mod test_support;

/// Application state shared across handlers
pub struct AppState {
    pub source: Box<dyn PairSource>,
    /// Addresses beyond this count are ignored by the bulk endpoint
    pub bulk_max_addresses: usize,
    /// Upstream fetches in flight per bulk request
    pub bulk_concurrency: usize,
}

mod defaults {
    pub const API_PORT: &str = "8080";
    pub const API_HOST: &str = "0.0.0.0";
    pub const BULK_MAX_ADDRESSES: &str = "50";
    pub const BULK_CONCURRENCY: &str = "4";
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Meme Scout API Server...");

    // Also loads .env for the settings below
    let client = dexscreener::initialize_client()?;

    let bulk_max_addresses = env::var("BULK_MAX_ADDRESSES")
        .unwrap_or_else(|_| defaults::BULK_MAX_ADDRESSES.to_string())
        .parse::<usize>()?;
    if bulk_max_addresses > routes::score::BULK_ADDRESS_CAP {
        tracing::warn!(
            "BULK_MAX_ADDRESSES={} exceeds the cap, using {}",
            bulk_max_addresses,
            routes::score::BULK_ADDRESS_CAP
        );
    }
    let bulk_max_addresses = bulk_max_addresses.min(routes::score::BULK_ADDRESS_CAP);
    let bulk_concurrency = env::var("BULK_CONCURRENCY")
        .unwrap_or_else(|_| defaults::BULK_CONCURRENCY.to_string())
        .parse::<usize>()?;

    tracing::info!(
        "Bulk scoring capped at {} addresses, {} concurrent fetches",
        bulk_max_addresses,
        bulk_concurrency
    );

    let state = Arc::new(AppState {
        source: Box::new(client),
        bulk_max_addresses,
        bulk_concurrency,
    });

    let app = app(state);

    // Get port from environment
    let port = env::var("API_PORT")
        .unwrap_or_else(|_| defaults::API_PORT.to_string())
        .parse::<u16>()
        .unwrap_or(8080);

    let host = env::var("API_HOST").unwrap_or_else(|_| defaults::API_HOST.to_string());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with all routes and middleware
fn app(state: Arc<AppState>) -> Router {
    // The extension runs on arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Root endpoint with API info
        .route("/", get(root))
        // Health check
        .route("/healthz", get(health_check))
        .merge(routes::score_routes())
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Root endpoint - API information
async fn root() -> axum::response::Html<&'static str> {
    axum::response::Html(r#"
<!DOCTYPE html>
<html>
<head>
    <title>Meme Scout API</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; background: #1a1a2e; color: #eee; }
        code { background: #333; padding: 2px 6px; border-radius: 4px; }
        .endpoint { margin: 10px 0; padding: 10px; background: #252540; border-radius: 8px; }
        .method { color: #4caf50; font-weight: bold; }
    </style>
</head>
<body>
    <h1>Meme Scout API</h1>
    <p>Meme coin confidence scores from DEX Screener pair data</p>

    <div class="endpoint">
        <span class="method">GET</span> <code>/healthz</code> - Health check
    </div>
    <div class="endpoint">
        <span class="method">GET</span> <code>/score?address=&lt;mint&gt;&amp;chain=sol</code> - Score one token
    </div>
    <div class="endpoint">
        <span class="method">GET</span> <code>/score/by-name?q=&lt;ticker&gt;&amp;chain=sol</code> - Score the best search match
    </div>
    <div class="endpoint">
        <span class="method">GET</span> <code>/score/bulk?addresses=&lt;mint&gt;,&lt;mint&gt;</code> - Score up to 50 tokens
    </div>
</body>
</html>
    "#)
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "ok": true, "ts": Utc::now().timestamp() }))
}
