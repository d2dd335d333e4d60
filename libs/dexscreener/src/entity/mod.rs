pub mod pair;

// Re-exports for convenience
pub use pair::{Liquidity, PriceChange, TokenRef, TradingPair, TxnWindow, Txns};
