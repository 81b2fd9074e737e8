use std::path::Path;

use tracing::info;

use crate::config::scoring::DEFAULT_SCORE;
use crate::error::Result;
use crate::scorer::ScoreDistribution;
use crate::types::WalletScore;

const SAMPLE_ROWS: usize = 10;
const DEFAULT_SAMPLE_ROWS: usize = 5;

/// Write the `wallet_id,score` CSV, one row per wallet.
pub fn write_scores_csv(path: &Path, scores: &[WalletScore]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in scores {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Log top/bottom scorers, a few default-scored wallets and the bucket counts.
pub fn log_summary(scores: &[WalletScore], distribution: &ScoreDistribution) {
    let mut ranked: Vec<&WalletScore> = scores.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    info!("[REPORT] top {} scores:", SAMPLE_ROWS.min(ranked.len()));
    for s in ranked.iter().take(SAMPLE_ROWS) {
        info!("[REPORT]   {:<44} {:>5}", s.wallet_id, s.score);
    }

    info!("[REPORT] bottom {} scores:", SAMPLE_ROWS.min(ranked.len()));
    for s in ranked.iter().rev().take(SAMPLE_ROWS) {
        info!("[REPORT]   {:<44} {:>5}", s.wallet_id, s.score);
    }

    let defaults: Vec<_> = scores.iter().filter(|s| s.score == DEFAULT_SCORE).collect();
    info!(
        "[REPORT] {} wallets at the default score {DEFAULT_SCORE} (showing up to {DEFAULT_SAMPLE_ROWS})",
        defaults.len()
    );
    for s in defaults.iter().take(DEFAULT_SAMPLE_ROWS) {
        info!("[REPORT]   {}", s.wallet_id);
    }

    info!("[REPORT] score distribution across {} wallets:", distribution.total());
    for (label, count) in distribution.rows() {
        info!("[REPORT]   {label:>9} | {count}");
    }
}
