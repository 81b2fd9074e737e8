use std::collections::{HashMap, HashSet};

use crate::config::scoring::*;
use crate::types::{WalletFeatures, WalletScore};

/// Per-batch maxima of the normalized feature columns.
///
/// Every positive term is scaled by its column's maximum across the whole
/// batch, so a wallet's score depends on who else is in the run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchMaxima {
    pub protocol_tx_count: f64,
    pub wallet_age_days: f64,
    pub native_value_sum: f64,
    pub unique_asset_count: f64,
}

impl BatchMaxima {
    pub fn from_features(features: &[WalletFeatures]) -> Self {
        features.iter().fold(Self::default(), |m, f| Self {
            protocol_tx_count: m.protocol_tx_count.max(f.protocol_tx_count as f64),
            wallet_age_days: m.wallet_age_days.max(f.wallet_age_days as f64),
            native_value_sum: m.native_value_sum.max(f.native_value_sum),
            unique_asset_count: m.unique_asset_count.max(f.unique_asset_count as f64),
        })
    }
}

/// `value / max` clipped to at most 1. `None` when the batch max is 0, which
/// drops the whole weighted term rather than contributing 0.
fn normalized(value: f64, max: f64) -> Option<f64> {
    (max > 0.0).then(|| (value / max).min(1.0))
}

/// Capped absolute penalty; never normalized against the batch.
pub fn liquidation_penalty(liquidation_count: u64) -> f64 {
    (liquidation_count as f64 * LIQUIDATION_PENALTY).min(LIQUIDATION_PENALTY_CAP)
}

/// Clip to [MIN_SCORE, MAX_SCORE] then truncate toward zero.
pub fn clip_score(raw: f64) -> u32 {
    if raw.is_nan() {
        return DEFAULT_SCORE;
    }
    raw.clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u32
}

/// Weighted score for one wallet (higher = lower risk).
pub fn compute_score(f: &WalletFeatures, max: &BatchMaxima) -> u32 {
    let terms = [
        (f.protocol_tx_count as f64, max.protocol_tx_count, PROTOCOL_TX_WEIGHT),
        (f.wallet_age_days as f64, max.wallet_age_days, WALLET_AGE_WEIGHT),
        (f.native_value_sum, max.native_value_sum, NATIVE_VALUE_WEIGHT),
        (f.unique_asset_count as f64, max.unique_asset_count, UNIQUE_ASSET_WEIGHT),
    ];

    let bonus: f64 = terms
        .iter()
        .filter_map(|&(value, max, weight)| normalized(value, max).map(|n| n * weight))
        .sum();

    clip_score(BASE_SCORE + bonus - liquidation_penalty(f.liquidation_count))
}

/// Score every wallet that has features, keyed by wallet address.
pub fn score_wallets(features: &[WalletFeatures]) -> HashMap<String, u32> {
    let maxima = BatchMaxima::from_features(features);
    features
        .iter()
        .map(|f| (f.wallet_address.clone(), compute_score(f, &maxima)))
        .collect()
}

/// Left-join the original wallet list against the computed scores.
///
/// One row per distinct input id, in first-seen order. Ids without a score get
/// DEFAULT_SCORE; scored wallets that are not in the list are dropped.
pub fn merge_with_wallet_list(wallet_ids: &[String], scores: &HashMap<String, u32>) -> Vec<WalletScore> {
    let mut seen = HashSet::new();
    wallet_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .map(|id| WalletScore {
            wallet_id: id.clone(),
            score: scores
                .get(id)
                .copied()
                .unwrap_or(DEFAULT_SCORE)
                .clamp(MIN_SCORE, MAX_SCORE),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(addr: &str, protocol: u64, age: u64, native: f64, assets: u64, liquidations: u64) -> WalletFeatures {
        WalletFeatures {
            wallet_address: addr.to_string(),
            total_tx_count: protocol + liquidations,
            protocol_tx_count: protocol,
            token_transfer_count: protocol,
            native_value_sum: native,
            token_value_sum: 0.0,
            unique_asset_count: assets,
            liquidation_count: liquidations,
            wallet_age_days: age,
        }
    }

    #[test]
    fn penalty_steps_and_caps() {
        assert_eq!(liquidation_penalty(0), 0.0);
        assert_eq!(liquidation_penalty(1), 400.0);
        assert_eq!(liquidation_penalty(2), 800.0);
        assert_eq!(liquidation_penalty(7), 800.0);
    }

    #[test]
    fn clip_truncates_and_bounds() {
        assert_eq!(clip_score(766.67), 766);
        assert_eq!(clip_score(-34.0), 0);
        assert_eq!(clip_score(1200.0), 1000);
        assert_eq!(clip_score(f64::NAN), DEFAULT_SCORE);
    }

    #[test]
    fn zero_max_columns_are_skipped() {
        // Nobody has any positive feature: only base and penalty apply.
        let features = vec![
            wallet("0xA", 0, 0, 0.0, 0, 0),
            wallet("0xB", 0, 0, 0.0, 0, 1),
            wallet("0xC", 0, 0, 0.0, 0, 3),
        ];
        let scores = score_wallets(&features);
        assert_eq!(scores["0xA"], 500);
        assert_eq!(scores["0xB"], 100);
        assert_eq!(scores["0xC"], 0);
    }

    #[test]
    fn batch_leader_gets_full_weight() {
        // Scenario: leader in tx count and age, no native value, 1 of max 3 assets.
        let features = vec![
            wallet("0xLeader", 10, 30, 0.0, 1, 0),
            wallet("0xOther", 4, 10, 0.0, 3, 0),
        ];
        let scores = score_wallets(&features);
        // 500 + 150 + 100 + 50/3 = 766.67, truncated
        assert_eq!(scores["0xLeader"], 766);
    }

    #[test]
    fn leader_with_two_liquidations_floors_at_zero() {
        let features = vec![
            wallet("0xLeader", 10, 30, 0.0, 1, 2),
            wallet("0xOther", 4, 10, 0.0, 3, 0),
        ];
        assert_eq!(score_wallets(&features)["0xLeader"], 0);
    }

    #[test]
    fn native_value_normalized_against_batch() {
        let features = vec![
            wallet("0xA", 0, 0, 2e18, 0, 0),
            wallet("0xB", 0, 0, 1e18, 0, 0),
        ];
        let scores = score_wallets(&features);
        assert_eq!(scores["0xA"], 600);
        assert_eq!(scores["0xB"], 550);
    }

    #[test]
    fn scores_stay_in_range() {
        let features = vec![
            wallet("0xMax", 50, 900, 5e21, 5, 0),
            wallet("0xMin", 0, 0, 0.0, 0, 9),
        ];
        let scores = score_wallets(&features);
        assert_eq!(scores["0xMax"], 900);
        assert_eq!(scores["0xMin"], 0);
        assert!(scores.values().all(|&s| s <= MAX_SCORE));
    }

    #[test]
    fn scoring_is_deterministic() {
        let features = vec![
            wallet("0xA", 3, 12, 1e17, 2, 0),
            wallet("0xB", 7, 4, 0.0, 1, 1),
        ];
        assert_eq!(score_wallets(&features), score_wallets(&features));
    }

    #[test]
    fn merge_defaults_unscored_and_drops_unknown() {
        let ids: Vec<String> = ["0xA", "0xB", "0xA", "0xC"].iter().map(|s| s.to_string()).collect();
        let scores = HashMap::from([
            ("0xA".to_string(), 812),
            ("0xDummyGoodWallet1".to_string(), 900),
        ]);
        let merged = merge_with_wallet_list(&ids, &scores);
        assert_eq!(
            merged,
            vec![
                WalletScore { wallet_id: "0xA".into(), score: 812 },
                WalletScore { wallet_id: "0xB".into(), score: 500 },
                WalletScore { wallet_id: "0xC".into(), score: 500 },
            ]
        );
    }

    #[test]
    fn merge_reclips_out_of_range_scores() {
        let ids = vec!["0xA".to_string()];
        let scores = HashMap::from([("0xA".to_string(), 4000)]);
        assert_eq!(merge_with_wallet_list(&ids, &scores)[0].score, MAX_SCORE);
    }
}
