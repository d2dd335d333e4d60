use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DexError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid `{name}` value: `{value}`")]
    InvalidConfig { name: &'static str, value: String },
}
