//! Meme score module
//!
//! Turns the raw DEX Screener pairs for a token into a 0-100 score:
//! - Pair selection: narrow many candidate pairs to the one that best represents the token
//! - Meme score: liquidity, activity, buy pressure, momentum, promotion and freshness rules

pub mod meme_score;
pub mod pair_selector;

pub use meme_score::{MemeScoreCalculator, Risk, ScoreResult};
pub use pair_selector::{select_best_pair, DEFAULT_CHAIN};
