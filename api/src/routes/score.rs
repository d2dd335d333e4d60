//! Score API routes

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use futures::{stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    scoring::{select_best_pair, MemeScoreCalculator, ScoreResult, DEFAULT_CHAIN},
    AppState,
};

/// Scored token response - score payload plus what was queried
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredToken {
    #[serde(flatten)]
    pub result: ScoreResult,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Epoch seconds
    pub updated_at: i64,
}

/// One entry of a bulk response
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BulkItem {
    Scored(ScoredToken),
    Failed { address: String, error: String },
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub results: Vec<BulkItem>,
}

/// Query params for score endpoint
#[derive(Debug, Deserialize)]
pub struct ScoreParams {
    pub address: String,
    pub chain: Option<String>,
}

/// Query params for by-name endpoint
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub chain: Option<String>,
}

/// Query params for bulk endpoint
#[derive(Debug, Deserialize)]
pub struct BulkParams {
    /// Comma-separated mint addresses
    pub addresses: String,
    pub chain: Option<String>,
}

/// Hard upper bound on addresses scored per bulk request
pub const BULK_ADDRESS_CAP: usize = 50;

fn scored(result: ScoreResult, address: String, symbol: Option<String>) -> ScoredToken {
    ScoredToken {
        result,
        address,
        symbol,
        updated_at: Utc::now().timestamp(),
    }
}

/// Fetch, select and score a single token by mint address
async fn score_address(
    state: &AppState,
    address: &str,
    chain: &str,
) -> Result<ScoredToken, ApiError> {
    let pairs = state.source.pairs_by_token(address).await?;
    let pair = select_best_pair(&pairs, chain).ok_or(ApiError::NotFound)?;

    tracing::debug!(
        "Scoring {} using pair {:?} on {:?}",
        address,
        pair.pair_address,
        pair.chain_identifier()
    );

    let result = MemeScoreCalculator::calculate(pair, Utc::now().timestamp_millis());
    tracing::debug!("Scored {}: {} ({} risk)", address, result.score, result.risk.as_str());

    Ok(scored(result, address.to_string(), None))
}

fn parse_addresses(raw: &str, limit: usize) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .take(limit)
        .map(String::from)
        .collect()
}

/// GET /score
/// Returns the meme score for one token mint address
pub async fn get_score(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScoreParams>,
) -> Result<Json<ScoredToken>, ApiError> {
    let address = params.address.trim();
    if address.is_empty() {
        return Err(ApiError::MissingParam("address"));
    }
    let chain = params.chain.as_deref().unwrap_or(DEFAULT_CHAIN);

    match score_address(&state, address, chain).await {
        Ok(token) => Ok(Json(token)),
        Err(e) => {
            match &e {
                ApiError::Upstream(err) => {
                    tracing::warn!("Failed to fetch pairs for {}: {}", address, err)
                }
                _ => tracing::debug!("No pair for {}: {}", address, e),
            }
            Err(e)
        }
    }
}

/// GET /score/by-name
/// Searches pairs by ticker or name and scores the best match
pub async fn get_score_by_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ScoredToken>, ApiError> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::MissingParam("q"));
    }
    let chain = params.chain.as_deref().unwrap_or(DEFAULT_CHAIN);

    let pairs = state.source.search_pairs(query).await.map_err(|e| {
        tracing::warn!("Failed to search pairs for {:?}: {}", query, e);
        ApiError::from(e)
    })?;

    let Some(pair) = select_best_pair(&pairs, chain) else {
        tracing::debug!("No pairs found for {:?}", query);
        return Err(ApiError::NoSearchResults);
    };

    let address = pair
        .base_token
        .address
        .clone()
        .unwrap_or_else(|| query.to_string());
    let symbol = pair
        .base_token
        .symbol
        .clone()
        .unwrap_or_else(|| query.to_string());

    let result = MemeScoreCalculator::calculate(pair, Utc::now().timestamp_millis());
    Ok(Json(scored(result, address, Some(symbol))))
}

/// GET /score/bulk
/// Scores up to `bulk_max_addresses` tokens (never more than 50); failures are reported per item
pub async fn get_score_bulk(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BulkParams>,
) -> Json<BulkResponse> {
    let state = state.as_ref();
    let chain = params.chain.as_deref().unwrap_or(DEFAULT_CHAIN);
    let limit = state.bulk_max_addresses.min(BULK_ADDRESS_CAP);
    let addresses = parse_addresses(&params.addresses, limit);

    tracing::debug!("Bulk scoring {} addresses", addresses.len());

    let results = stream::iter(addresses)
        .map(move |address| async move {
            match score_address(state, &address, chain).await {
                Ok(token) => BulkItem::Scored(token),
                Err(e) => {
                    let error = match e {
                        ApiError::NotFound => "not_found".to_string(),
                        ApiError::Upstream(err) => {
                            tracing::warn!("Failed to fetch pairs for {}: {}", address, err);
                            err.to_string()
                        }
                        other => other.to_string(),
                    };
                    BulkItem::Failed { address, error }
                }
            }
        })
        .buffered(state.bulk_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    Json(BulkResponse { results })
}
