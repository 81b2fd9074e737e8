use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use tracing::{info, warn};

use crate::config::Config;
use crate::features::{aggregate_features, normalize, NormalizedTx};
use crate::scorer::{merge_with_wallet_list, score_wallets};
use crate::synthetic;
use crate::types::{RawTransaction, WalletFeatures, WalletScore};

/// Where the transactions fed to the feature stage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Explorer,
    Synthetic,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Explorer => write!(f, "explorer"),
            DataSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Keep the fetched set, or substitute the synthetic dataset when the whole
/// run fetched nothing. Never applied per wallet.
pub fn with_fallback<R: Rng>(
    fetched: Vec<RawTransaction>,
    rng: &mut R,
    cfg: &Config,
) -> (Vec<RawTransaction>, DataSource) {
    if !fetched.is_empty() {
        return (fetched, DataSource::Explorer);
    }
    warn!("[FALLBACK] no transactions fetched for any wallet, substituting synthetic dataset");
    let txs = synthetic::generate(rng, cfg, now_secs());
    (txs, DataSource::Synthetic)
}

/// Feature stage: coerce every record, then fold per wallet.
pub fn build_features(txs: &[RawTransaction]) -> (Vec<NormalizedTx>, Vec<WalletFeatures>) {
    let normalized: Vec<NormalizedTx> = txs.iter().map(normalize).collect();
    let features = aggregate_features(&normalized);
    info!(
        "[FEATURES] {} records across {} active wallets",
        normalized.len(),
        features.len()
    );
    (normalized, features)
}

/// Scoring stage: batch-relative scores merged onto the full input list.
pub fn score(wallet_ids: &[String], features: &[WalletFeatures]) -> Vec<WalletScore> {
    let scored = score_wallets(features);
    let merged = merge_with_wallet_list(wallet_ids, &scored);
    let matched = merged.iter().filter(|s| scored.contains_key(&s.wallet_id)).count();
    info!(
        "[SCORE] {} wallets scored ({} from activity, {} defaulted)",
        merged.len(),
        matched,
        merged.len() - matched
    );
    merged
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
