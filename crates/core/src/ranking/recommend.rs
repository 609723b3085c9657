//! Composite recommendation scoring

use std::cmp::Ordering;

use super::types::*;
use super::{DEGENERATE_NORM, MAX_RATING};
use crate::domain::product::Product;

/// Ranks a candidate set by composite desirability or by one raw field.
#[derive(Debug, Clone, Default)]
pub struct RecommendationScorer {
    weights: RecommendationWeights,
}

impl RecommendationScorer {
    pub fn new() -> Self {
        Self { weights: RecommendationWeights::default() }
    }

    pub fn with_weights(weights: RecommendationWeights) -> Self {
        Self { weights }
    }

    /// Score every candidate, keeping input order. Review and price
    /// normalization use the min/max of this candidate set only, so the same
    /// product scores differently under different filters.
    pub fn score_all<'a>(&self, candidates: &[&'a Product]) -> Vec<ScoredProduct<'a>> {
        let reviews = Spread::over(candidates.iter().map(|product| product.num_reviews as f64));
        let prices = Spread::over(candidates.iter().map(|product| product.price));

        candidates
            .iter()
            .map(|product| {
                let rating_norm = product.rating / MAX_RATING;
                let reviews_norm = reviews.normalize(product.num_reviews as f64);
                let price_norm = 1.0 - prices.normalize(product.price);
                let score = self.weights.rating * rating_norm
                    + self.weights.reviews * reviews_norm
                    + self.weights.price * price_norm;
                ScoredProduct::new(product, score)
            })
            .collect()
    }

    /// Order candidates by `sort_by` and keep the first `limit`. Sorting is
    /// stable, so equal keys retain their input order.
    pub fn recommend<'a>(
        &self,
        candidates: &[&'a Product],
        sort_by: SortBy,
        limit: usize,
    ) -> Vec<ScoredProduct<'a>> {
        let mut scored = self.score_all(candidates);
        scored.sort_by(|a, b| compare(sort_by, a, b));
        scored.truncate(limit);
        scored
    }
}

fn compare(sort_by: SortBy, a: &ScoredProduct<'_>, b: &ScoredProduct<'_>) -> Ordering {
    match sort_by {
        SortBy::Score => by_value(b.score, a.score),
        SortBy::PriceAsc => by_value(a.product.price, b.product.price),
        SortBy::PriceDesc => by_value(b.product.price, a.product.price),
        SortBy::Rating => by_value(b.product.rating, a.product.rating),
        SortBy::Reviews => b.product.num_reviews.cmp(&a.product.num_reviews),
    }
}

/// Numeric order where `-0.0 == 0.0`. Catalog values are finite, so the
/// incomparable case does not arise.
fn by_value(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Copy)]
struct Spread {
    min: f64,
    max: f64,
}

impl Spread {
    fn over(values: impl Iterator<Item = f64>) -> Self {
        values.fold(Self { min: f64::INFINITY, max: f64::NEG_INFINITY }, |spread, value| Self {
            min: spread.min.min(value),
            max: spread.max.max(value),
        })
    }

    /// Position of `value` within the spread on a 0..=1 scale; zero spread
    /// (including a single candidate) yields the neutral midpoint.
    fn normalize(&self, value: f64) -> f64 {
        if self.max > self.min {
            (value - self.min) / (self.max - self.min)
        } else {
            DEGENERATE_NORM
        }
    }
}
