//! Product ranking
//!
//! Two scorers order a candidate set: a composite desirability score built
//! from rating, review volume, and price, and a pairwise similarity score
//! relative to one reference product. Both are pure functions of their input.

mod engine;
mod recommend;
mod similarity;
mod types;

pub use engine::RecommendationEngine;
pub use recommend::RecommendationScorer;
pub use similarity::SimilarityScorer;
pub use types::*;

/// Default composite weights (rating, reviews, price).
pub const DEFAULT_RECOMMENDATION_WEIGHTS: RecommendationWeights =
    RecommendationWeights { rating: 0.5, reviews: 0.3, price: 0.2 };

/// Default similarity weights (price, rating, brand).
pub const DEFAULT_SIMILARITY_WEIGHTS: SimilarityWeights =
    SimilarityWeights { price: 0.3, rating: 0.4, brand: 0.3 };

/// Normalized value used when a dimension has no spread across the set.
pub const DEGENERATE_NORM: f64 = 0.5;

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// Result size for `/recommend` when the caller does not send one.
pub const DEFAULT_RECOMMEND_LIMIT: usize = 20;

/// Result size for similar-product lookups when the caller does not send one.
pub const DEFAULT_SIMILAR_LIMIT: i64 = 5;
