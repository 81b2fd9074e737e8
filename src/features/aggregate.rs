use std::collections::{BTreeMap, BTreeSet};

use crate::config::SECONDS_PER_DAY;
use crate::features::normalize::NormalizedTx;
use crate::types::{Category, WalletFeatures};

/// Running per-wallet totals, folded one record at a time.
#[derive(Debug, Default)]
struct WalletAccumulator {
    total_tx_count: u64,
    protocol_tx_count: u64,
    token_transfer_count: u64,
    native_value_sum: f64,
    token_value_sum: f64,
    symbols: BTreeSet<String>,
    liquidation_count: u64,
    first_ts: Option<f64>,
    last_ts: Option<f64>,
}

impl WalletAccumulator {
    fn add(&mut self, tx: &NormalizedTx) {
        self.total_tx_count += 1;
        if tx.category.is_protocol() {
            self.protocol_tx_count += 1;
        }
        if tx.category.is_token_transfer() {
            self.token_transfer_count += 1;
            self.token_value_sum += tx.value;
        }
        match tx.category {
            Category::NativeContractTx => self.native_value_sum += tx.value,
            Category::Liquidate => self.liquidation_count += 1,
            Category::TokenTransfer(_) => {}
        }
        if let Some(symbol) = &tx.token_symbol {
            self.symbols.insert(symbol.clone());
        }
        if let Some(ts) = tx.timestamp {
            self.first_ts = Some(self.first_ts.map_or(ts, |t| t.min(ts)));
            self.last_ts = Some(self.last_ts.map_or(ts, |t| t.max(ts)));
        }
    }

    fn finish(self, wallet_address: String) -> WalletFeatures {
        let wallet_age_days = match (self.first_ts, self.last_ts) {
            (Some(first), Some(last)) => finite_or_zero(((last - first) / SECONDS_PER_DAY).floor()) as u64,
            _ => 0,
        };
        WalletFeatures {
            wallet_address,
            total_tx_count: self.total_tx_count,
            protocol_tx_count: self.protocol_tx_count,
            token_transfer_count: self.token_transfer_count,
            native_value_sum: finite_or_zero(self.native_value_sum),
            token_value_sum: finite_or_zero(self.token_value_sum),
            unique_asset_count: self.symbols.len() as u64,
            liquidation_count: self.liquidation_count,
            wallet_age_days,
        }
    }
}

/// Sums of very large raw amounts can overflow to infinity.
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() && v >= 0.0 {
        v
    } else {
        0.0
    }
}

/// Group records by owning wallet and reduce each group to a feature row.
/// One row per wallet that owns at least one record, sorted by address.
pub fn aggregate_features(txs: &[NormalizedTx]) -> Vec<WalletFeatures> {
    let mut by_wallet: BTreeMap<&str, WalletAccumulator> = BTreeMap::new();
    for tx in txs {
        by_wallet.entry(tx.wallet_address.as_str()).or_default().add(tx);
    }
    by_wallet
        .into_iter()
        .map(|(wallet, acc)| acc.finish(wallet.to_string()))
        .collect()
}
