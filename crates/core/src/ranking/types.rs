//! Types shared by the scorers

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Ordering applied to a recommendation result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Composite score, highest first
    #[default]
    Score,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Highest rating first
    Rating,
    /// Most reviewed first
    Reviews,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Score => "score",
            SortBy::PriceAsc => "price_asc",
            SortBy::PriceDesc => "price_desc",
            SortBy::Rating => "rating",
            SortBy::Reviews => "reviews",
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(Self::Score),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "rating" => Ok(Self::Rating),
            "reviews" => Ok(Self::Reviews),
            other => Err(format!(
                "unsupported sort `{other}` (expected score|price_asc|price_desc|rating|reviews)"
            )),
        }
    }
}

/// Weights for the composite recommendation score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationWeights {
    /// Weight for `rating / 5` (default: 0.5)
    pub rating: f64,
    /// Weight for min-max normalized review count (default: 0.3)
    pub reviews: f64,
    /// Weight for inverted min-max normalized price (default: 0.2)
    pub price: f64,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        super::DEFAULT_RECOMMENDATION_WEIGHTS
    }
}

/// Weights for pairwise similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityWeights {
    /// Weight for price closeness (default: 0.3)
    pub price: f64,
    /// Weight for rating closeness (default: 0.4)
    pub rating: f64,
    /// Weight for exact brand match (default: 0.3)
    pub brand: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        super::DEFAULT_SIMILARITY_WEIGHTS
    }
}

/// A catalog product paired with the score it was ranked by. Lives only for
/// the duration of one ranking call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredProduct<'a> {
    pub product: &'a Product,
    pub score: f64,
}

impl<'a> ScoredProduct<'a> {
    pub fn new(product: &'a Product, score: f64) -> Self {
        Self { product, score }
    }
}
