pub mod distribution;
pub mod risk_scorer;

pub use distribution::ScoreDistribution;
pub use risk_scorer::{merge_with_wallet_list, score_wallets};
