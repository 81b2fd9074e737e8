use crate::config::scoring::{BUCKET_COUNT, BUCKET_WIDTH, MAX_SCORE};
use crate::types::WalletScore;

/// Count of final scores per fixed-width bucket. The last bucket is closed at
/// MAX_SCORE so a perfect score lands in `900-1000`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreDistribution {
    pub counts: [usize; BUCKET_COUNT],
}

impl ScoreDistribution {
    pub fn from_scores(scores: &[WalletScore]) -> Self {
        let mut counts = [0usize; BUCKET_COUNT];
        for s in scores {
            counts[bucket_index(s.score)] += 1;
        }
        Self { counts }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(label, count)` pairs in ascending score order.
    pub fn rows(&self) -> impl Iterator<Item = (String, usize)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &count)| (bucket_label(i), count))
    }
}

pub fn bucket_index(score: u32) -> usize {
    ((score.min(MAX_SCORE) / BUCKET_WIDTH) as usize).min(BUCKET_COUNT - 1)
}

pub fn bucket_label(index: usize) -> String {
    let lo = index as u32 * BUCKET_WIDTH;
    let hi = if index == BUCKET_COUNT - 1 {
        MAX_SCORE
    } else {
        lo + BUCKET_WIDTH - 1
    };
    format!("{lo}-{hi}")
}
