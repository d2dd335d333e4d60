use std::fmt::Debug;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dexscreener::DexError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing `{0}` query parameter")]
    MissingParam(&'static str),

    #[error("DEX fetch failed: {0}")]
    Upstream(#[from] DexError),

    #[error("Token/pair not found on DEX Screener")]
    NotFound,

    #[error("No pairs found for query")]
    NoSearchResults,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotFound | ApiError::NoSearchResults => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
