//! API route definitions

pub mod score;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::AppState;

/// Create all scoring routes
pub fn score_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/score", get(score::get_score))
        .route("/score/by-name", get(score::get_score_by_name))
        .route("/score/bulk", get(score::get_score_bulk))
}
