//! Meme Score Calculator
//!
//! Scores a single trading pair from 0-100 using its short-window market
//! activity, and buckets the score into a risk level.
//!
//! Rule tiers, evaluated in order:
//! - Liquidity (0-15): $25k+ = 15, $10k+ = 8
//! - Activity (0-10): 15+ tx/min = 10, 8+ tx/min = 6
//! - Buy pressure (0-10): 60%+ buys = 10, 55%+ buys = 6
//! - Momentum (0-10): positive 5m change = 5, positive 1h change = 5
//! - Promotion (0-5): boosted = 5
//! - Freshness (0-5): pair created within the last hour = 5

use dexscreener::TradingPair;
use serde::Serialize;

/// Length of the transaction window the upstream reports, in minutes
const TXN_WINDOW_MINUTES: f64 = 5.0;
const MILLIS_PER_MINUTE: f64 = 60_000.0;
const FRESH_PAIR_MINUTES: f64 = 60.0;
const FAST_MIGRATION_MINUTES: f64 = 10.0;

/// Qualitative risk bucket derived from the score alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Mid,
    High,
}

impl Risk {
    /// `<40` is high risk, `40..70` mid, `70+` low
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => Risk::High,
            40..=69 => Risk::Mid,
            _ => Risk::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Risk::Low => "low",
            Risk::Mid => "mid",
            Risk::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFlags {
    /// Reserved for wallet concentration analysis; always false and not a
    /// verified absence of whales
    pub has_whales: bool,
    /// Pair is at most ten minutes old
    pub fast_migration: bool,
}

/// Normalized inputs the score was computed from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreMetrics {
    pub liq: f64,
    pub tpm: f64,
    pub buy_ratio: f64,
    pub m5: Option<f64>,
    pub h1: Option<f64>,
    pub age_min: Option<f64>,
}

/// Result of meme score calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Total score (0-100)
    pub score: u8,
    pub risk: Risk,
    /// Tags of the rules that fired, in evaluation order
    pub reasons: Vec<&'static str>,
    pub flags: ScoreFlags,
    pub metrics: ScoreMetrics,
}

/// Meme score calculator
pub struct MemeScoreCalculator;

impl MemeScoreCalculator {
    /// Calculate the meme score for a pair as of `now_ms` (epoch milliseconds).
    ///
    /// Missing or malformed upstream values count as zero or absent; this never fails.
    pub fn calculate(pair: &TradingPair, now_ms: i64) -> ScoreResult {
        let liq = pair.liquidity_usd();

        let buys = pair.txns.m5.buys;
        let sells = pair.txns.m5.sells;
        let total = buys.saturating_add(sells);
        let (tpm, buy_ratio) = if total > 0 {
            (
                total as f64 / TXN_WINDOW_MINUTES,
                buys as f64 / total as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let m5 = pair.price_change.m5;
        let h1 = pair.price_change.h1;
        let age_min = pair
            .pair_created_at
            .filter(|created| *created != 0)
            .map(|created| (now_ms.saturating_sub(created) as f64 / MILLIS_PER_MINUTE).max(0.0));

        let liquidity = match liq {
            l if l >= 25_000.0 => Some((15, "liq≥25k")),
            l if l >= 10_000.0 => Some((8, "liq≥10k")),
            _ => None,
        };

        let activity = match tpm {
            t if t >= 15.0 => Some((10, "tx/min≥15")),
            t if t >= 8.0 => Some((6, "tx/min≥8")),
            _ => None,
        };

        let buy_pressure = match buy_ratio {
            r if r >= 0.60 => Some((10, "buy≥60%")),
            r if r >= 0.55 => Some((6, "buy≥55%")),
            _ => None,
        };

        let momentum_5m = m5.filter(|c| *c > 0.0).map(|_| (5, "m5↑"));
        let momentum_1h = h1.filter(|c| *c > 0.0).map(|_| (5, "h1↑"));
        let promotion = pair.is_boosted().then_some((5, "boosted"));
        let freshness = age_min
            .filter(|age| *age <= FRESH_PAIR_MINUTES)
            .map(|_| (5, "new≤60m"));

        let mut points: u32 = 0;
        let mut reasons = Vec::new();
        for (rule_points, reason) in [
            liquidity,
            activity,
            buy_pressure,
            momentum_5m,
            momentum_1h,
            promotion,
            freshness,
        ]
        .into_iter()
        .flatten()
        {
            points += rule_points;
            reasons.push(reason);
        }

        // The rule table tops out at 55, the clamp still bounds the contract
        let score = points.min(100) as u8;

        ScoreResult {
            score,
            risk: Risk::from_score(score),
            reasons,
            flags: ScoreFlags {
                has_whales: false,
                fast_migration: age_min.is_some_and(|age| age <= FAST_MIGRATION_MINUTES),
            },
            metrics: ScoreMetrics {
                liq,
                tpm: round_to(tpm, 2),
                buy_ratio: round_to(buy_ratio, 3),
                m5,
                h1,
                age_min,
            },
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexscreener::entity::{Liquidity, PriceChange, TxnWindow, Txns};
    use serde_json::json;

    const NOW: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 60_000;

    fn pair(liq: f64, buys: u64, sells: u64) -> TradingPair {
        TradingPair {
            chain_id: Some("solana".to_string()),
            liquidity: Liquidity { usd: Some(liq) },
            txns: Txns {
                m5: TxnWindow { buys, sells },
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_hot_fresh_pair() {
        let mut p = pair(30_000.0, 40, 10);
        p.price_change = PriceChange {
            m5: Some(2.5),
            h1: Some(1.1),
        };
        p.boosts = Some(json!({ "active": 1 }));
        p.pair_created_at = Some(NOW - 5 * MINUTE);

        let result = MemeScoreCalculator::calculate(&p, NOW);

        // 50 txns over 5 minutes is 10 tx/min, the lower activity tier
        assert_eq!(result.score, 15 + 6 + 10 + 5 + 5 + 5 + 5);
        assert_eq!(result.risk, Risk::Mid);
        assert_eq!(
            result.reasons,
            vec!["liq≥25k", "tx/min≥8", "buy≥60%", "m5↑", "h1↑", "boosted", "new≤60m"]
        );
        assert!(result.flags.fast_migration);
        assert!(!result.flags.has_whales);
        assert_eq!(result.metrics.tpm, 10.0);
        assert_eq!(result.metrics.buy_ratio, 0.8);
        assert_eq!(result.metrics.age_min, Some(5.0));
    }

    #[test]
    fn test_every_top_tier() {
        let mut p = pair(100_000.0, 70, 10);
        p.price_change = PriceChange {
            m5: Some(0.1),
            h1: Some(12.0),
        };
        p.boosts = Some(json!(true));
        p.pair_created_at = Some(NOW - 30 * MINUTE);

        let result = MemeScoreCalculator::calculate(&p, NOW);

        assert_eq!(result.score, 55);
        assert_eq!(result.risk, Risk::Mid);
        assert_eq!(
            result.reasons,
            vec!["liq≥25k", "tx/min≥15", "buy≥60%", "m5↑", "h1↑", "boosted", "new≤60m"]
        );
        assert!(!result.flags.fast_migration);
    }

    #[test]
    fn test_empty_pair() {
        let result = MemeScoreCalculator::calculate(&TradingPair::default(), NOW);

        assert_eq!(result.score, 0);
        assert_eq!(result.risk, Risk::High);
        assert!(result.reasons.is_empty());
        assert_eq!(result.metrics.age_min, None);
        assert_eq!(result.metrics.m5, None);
        assert_eq!(result.metrics.h1, None);
        assert_eq!(result.metrics.tpm, 0.0);
        assert_eq!(result.metrics.buy_ratio, 0.0);
        assert!(!result.flags.fast_migration);
        assert!(!result.flags.has_whales);
    }

    #[test]
    fn test_lower_tiers() {
        // 45 txns = 9 tx/min, 26/45 = 57.8% buys
        let result = MemeScoreCalculator::calculate(&pair(12_000.0, 26, 19), NOW);

        assert_eq!(result.score, 8 + 6 + 6);
        assert_eq!(result.reasons, vec!["liq≥10k", "tx/min≥8", "buy≥55%"]);
        assert_eq!(result.metrics.tpm, 9.0);
        assert_eq!(result.metrics.buy_ratio, 0.578);
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        // 75 txns = 15 tx/min, 45/75 = 60% buys
        let result = MemeScoreCalculator::calculate(&pair(25_000.0, 45, 30), NOW);
        assert_eq!(result.reasons, vec!["liq≥25k", "tx/min≥15", "buy≥60%"]);

        // 40 txns = 8 tx/min, 22/40 = 55% buys
        let result = MemeScoreCalculator::calculate(&pair(10_000.0, 22, 18), NOW);
        assert_eq!(result.reasons, vec!["liq≥10k", "tx/min≥8", "buy≥55%"]);

        let result = MemeScoreCalculator::calculate(&pair(9_999.99, 21, 18), NOW);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_ratio_halves_round_to_even() {
        // 1/16 = 0.0625 and 9/16 = 0.5625 sit exactly between two thousandths
        let result = MemeScoreCalculator::calculate(&pair(0.0, 1, 15), NOW);
        assert_eq!(result.metrics.buy_ratio, 0.062);

        let result = MemeScoreCalculator::calculate(&pair(0.0, 9, 7), NOW);
        assert_eq!(result.metrics.buy_ratio, 0.562);
        assert_eq!(result.reasons, vec!["buy≥55%"]);

        // 16 txns = 3.2 tx/min
        assert_eq!(result.metrics.tpm, 3.2);
    }

    #[test]
    fn test_string_price_change_never_counts() {
        let p: TradingPair = serde_json::from_value(json!({
            "priceChange": { "m5": "2.5", "h1": "1.0" }
        }))
        .unwrap();

        let result = MemeScoreCalculator::calculate(&p, NOW);

        assert_eq!(result.score, 0);
        assert!(result.reasons.is_empty());
        assert_eq!(result.metrics.m5, None);
        assert_eq!(result.metrics.h1, None);
    }

    #[test]
    fn test_negative_momentum_ignored() {
        let mut p = pair(0.0, 0, 0);
        p.price_change = PriceChange {
            m5: Some(-4.0),
            h1: Some(0.0),
        };

        let result = MemeScoreCalculator::calculate(&p, NOW);

        assert!(result.reasons.is_empty());
        assert_eq!(result.metrics.m5, Some(-4.0));
        assert_eq!(result.metrics.h1, Some(0.0));
    }

    #[test]
    fn test_age() {
        let aged = |created: Option<i64>| {
            let mut p = TradingPair::default();
            p.pair_created_at = created;
            MemeScoreCalculator::calculate(&p, NOW)
        };

        let result = aged(Some(NOW - 10 * MINUTE));
        assert_eq!(result.metrics.age_min, Some(10.0));
        assert!(result.flags.fast_migration);
        assert_eq!(result.reasons, vec!["new≤60m"]);

        let result = aged(Some(NOW - 60 * MINUTE));
        assert!(!result.flags.fast_migration);
        assert_eq!(result.reasons, vec!["new≤60m"]);

        let result = aged(Some(NOW - 61 * MINUTE));
        assert!(result.reasons.is_empty());
        assert_eq!(result.metrics.age_min, Some(61.0));

        // Unrounded minutes
        let result = aged(Some(NOW - 90_000));
        assert_eq!(result.metrics.age_min, Some(1.5));

        // Clock skew never yields a negative age
        let result = aged(Some(NOW + 5 * MINUTE));
        assert_eq!(result.metrics.age_min, Some(0.0));
        assert!(result.flags.fast_migration);

        // Zero means unknown
        let result = aged(Some(0));
        assert_eq!(result.metrics.age_min, None);
        assert!(!result.flags.fast_migration);
    }

    #[test]
    fn test_risk_thresholds() {
        assert_eq!(Risk::from_score(0), Risk::High);
        assert_eq!(Risk::from_score(39), Risk::High);
        assert_eq!(Risk::from_score(40), Risk::Mid);
        assert_eq!(Risk::from_score(69), Risk::Mid);
        assert_eq!(Risk::from_score(70), Risk::Low);
        assert_eq!(Risk::from_score(100), Risk::Low);
        assert_eq!(Risk::Mid.as_str(), "mid");
    }

    #[test]
    fn test_score_bounds_and_tier_exclusivity() {
        let exclusive = [
            ("liq≥25k", "liq≥10k"),
            ("tx/min≥15", "tx/min≥8"),
            ("buy≥60%", "buy≥55%"),
        ];

        for liq in [0.0, 9_999.0, 10_000.0, 24_999.0, 25_000.0, 1e9] {
            for (buys, sells) in [(0, 0), (1, 0), (0, 1), (11, 9), (60, 40), (500, 1)] {
                for m5 in [None, Some(-1.0), Some(3.0)] {
                    for created in [None, Some(NOW - 3 * MINUTE), Some(NOW - 600 * MINUTE)] {
                        let mut p = pair(liq, buys, sells);
                        p.price_change.m5 = m5;
                        p.price_change.h1 = m5;
                        p.boosts = m5.map(|_| json!(1));
                        p.pair_created_at = created;

                        let result = MemeScoreCalculator::calculate(&p, NOW);

                        assert!(result.score <= 100);
                        assert_eq!(result.risk, Risk::from_score(result.score));
                        for (high, low) in exclusive {
                            assert!(
                                !(result.reasons.contains(&high) && result.reasons.contains(&low))
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let mut p = pair(18_000.0, 33, 7);
        p.price_change.m5 = Some(1.0);
        p.pair_created_at = Some(NOW - 42 * MINUTE);

        let first = serde_json::to_string(&MemeScoreCalculator::calculate(&p, NOW)).unwrap();
        let second = serde_json::to_string(&MemeScoreCalculator::calculate(&p, NOW)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_json_shape() {
        let result = MemeScoreCalculator::calculate(&TradingPair::default(), NOW);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "score": 0,
                "risk": "high",
                "reasons": [],
                "flags": { "hasWhales": false, "fastMigration": false },
                "metrics": {
                    "liq": 0.0,
                    "tpm": 0.0,
                    "buyRatio": 0.0,
                    "m5": null,
                    "h1": null,
                    "ageMin": null
                }
            })
        );
    }
}
