// Core scoring engine
pub mod compatibility;
pub mod distance;
pub mod ranker;
pub mod signals;

pub use compatibility::CompatibilityScorer;
pub use ranker::{RankingThresholds, VenueRanker};
