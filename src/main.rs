mod config;
mod error;
mod features;
mod fetcher;
mod pipeline;
mod report;
mod scorer;
mod synthetic;
mod types;
mod wallets;

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::features::NormalizedTx;
use crate::fetcher::{ExplorerClient, FetchStats, TransactionFetcher};
use crate::pipeline::{build_features, score, with_fallback, DataSource};
use crate::report::{log_summary, write_scores_csv};
use crate::scorer::ScoreDistribution;
use crate::types::{RawTransaction, WalletFeatures};
use crate::wallets::load_wallet_ids;

const SAMPLE_ROWS: usize = 5;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Wallet list ---
    info!(
        "Reading wallet list from {} (CSV with a '{}' header; spreadsheets must be exported to CSV first)",
        cfg.wallets_path,
        wallets::WALLET_ID_COLUMN
    );
    let wallet_ids = load_wallet_ids(Path::new(&cfg.wallets_path))?;
    info!("Loaded {} wallet ids from {}", wallet_ids.len(), cfg.wallets_path);
    if wallet_ids.is_empty() {
        warn!("Wallet list is empty: the score file will only contain a header");
    }

    // --- Fetch ---
    if cfg.explorer_api_key.is_empty() {
        warn!("EXPLORER_API_KEY not set: explorer queries will likely be rejected");
    }
    info!(
        "[FETCH] querying {} for {} wallets (controller {} + {} asset contracts)",
        cfg.explorer_api_url,
        wallet_ids.len(),
        cfg.controller_address,
        cfg.asset_contracts.len(),
    );
    let fetcher = TransactionFetcher::new(ExplorerClient::new(&cfg)?, &cfg);
    let (fetched, stats) = fetcher.fetch_all(&wallet_ids).await;
    log_fetch_stats(&stats, fetched.len());

    let (txs, source) = with_fallback(fetched, &mut StdRng::from_entropy(), &cfg);
    if source == DataSource::Synthetic {
        warn!("[FALLBACK] scores below are derived from synthetic data; listed wallets will default to 500");
    }

    // --- Features ---
    let (normalized, features) = build_features(&txs);
    log_transaction_sample(&txs, &normalized, source);
    log_feature_sample(&features);

    // --- Score + output ---
    let scores = score(&wallet_ids, &features);
    write_scores_csv(Path::new(&cfg.output_path), &scores)?;
    info!("Scores for {} wallets saved to {}", scores.len(), cfg.output_path);

    let distribution = ScoreDistribution::from_scores(&scores);
    log_summary(&scores, &distribution);

    Ok(())
}

fn log_fetch_stats(stats: &FetchStats, records: usize) {
    info!(
        "[FETCH] complete: {} records from {} wallets (native kept={} unrelated={} token_transfers={} failed_queries={})",
        records,
        stats.wallets,
        stats.native_kept,
        stats.native_unrelated,
        stats.token_transfers,
        stats.failed_queries,
    );
}

fn log_transaction_sample(raw: &[RawTransaction], normalized: &[NormalizedTx], source: DataSource) {
    info!("[FEATURES] sample of {} transactions:", source);
    for (tx, original) in normalized.iter().zip(raw).take(SAMPLE_ROWS) {
        info!(
            wallet = %tx.wallet_address,
            category = %tx.category,
            hash = %tx.hash,
            value = tx.value,
            timestamp = tx.timestamp_or_zero(),
            decimals = tx.token_decimal,
            from = tx.from_lower.as_deref().unwrap_or("-"),
            to = tx.to_lower.as_deref().unwrap_or("-"),
            detail = %original.detail,
            "[FEATURES]   {} {}",
            tx.wallet_address,
            tx.category,
        );
    }
}

fn log_feature_sample(features: &[WalletFeatures]) {
    for f in features.iter().take(SAMPLE_ROWS) {
        debug!(
            wallet = %f.wallet_address,
            total = f.total_tx_count,
            protocol = f.protocol_tx_count,
            token_transfers = f.token_transfer_count,
            native_value = f.native_value_sum,
            token_value = f.token_value_sum,
            assets = f.unique_asset_count,
            liquidations = f.liquidation_count,
            age_days = f.wallet_age_days,
            "[FEATURES] wallet features"
        );
    }
}
