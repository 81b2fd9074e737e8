pub mod aggregate;
pub mod normalize;

pub use aggregate::aggregate_features;
pub use normalize::{normalize, NormalizedTx};
