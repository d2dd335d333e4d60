use dexscreener::TradingPair;

/// Chain prefix preferred when the caller does not name one
pub const DEFAULT_CHAIN: &str = "sol";

/// Pick the pair that best represents a token.
///
/// Pairs whose chain identifier starts with `preferred_chain_prefix`
/// (case-insensitive) win over all others regardless of liquidity. When no pair
/// is on the preferred chain every pair is a candidate. Among candidates the
/// highest USD liquidity wins and the earliest pair wins an exact tie.
pub fn select_best_pair<'a>(
    pairs: &'a [TradingPair],
    preferred_chain_prefix: &str,
) -> Option<&'a TradingPair> {
    let prefix = preferred_chain_prefix.to_lowercase();

    let preferred: Vec<&TradingPair> = pairs
        .iter()
        .filter(|pair| {
            pair.chain_identifier()
                .is_some_and(|chain| chain.to_lowercase().starts_with(&prefix))
        })
        .collect();

    let candidates = if preferred.is_empty() {
        pairs.iter().collect()
    } else {
        preferred
    };

    candidates.into_iter().fold(None, |best, pair| match best {
        Some(best) if best.liquidity_usd() >= pair.liquidity_usd() => Some(best),
        _ => Some(pair),
    })
}
