//! Pairwise similarity against a reference product

use super::types::*;
use crate::catalog::ProductCatalog;
use crate::domain::product::{Product, ProductId};

/// Smallest divisor used for price and rating differences. It is an absolute
/// unit rather than an epsilon, which matters only when every candidate shares
/// the reference's price or rating.
const MIN_DIFF_DIVISOR: f64 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    weights: SimilarityWeights,
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self { weights: SimilarityWeights::default() }
    }

    /// Products in the reference's category ranked by similarity to it.
    /// An unknown reference, an empty category, or `limit <= 0` all yield an
    /// empty list.
    pub fn similar_to<'a>(
        &self,
        catalog: &'a ProductCatalog,
        reference_id: ProductId,
        limit: i64,
    ) -> Vec<ScoredProduct<'a>> {
        let Some(reference) = catalog.get(reference_id) else {
            return Vec::new();
        };
        let candidates: Vec<&Product> = catalog.peers_of(reference).collect();
        self.rank(reference, &candidates, limit)
    }

    /// Rank an explicit candidate list against `reference`.
    pub fn rank<'a>(
        &self,
        reference: &Product,
        candidates: &[&'a Product],
        limit: i64,
    ) -> Vec<ScoredProduct<'a>> {
        let limit = match usize::try_from(limit) {
            Ok(limit) if limit > 0 => limit,
            _ => return Vec::new(),
        };
        if candidates.is_empty() {
            return Vec::new();
        }

        let price_diffs: Vec<f64> =
            candidates.iter().map(|product| (product.price - reference.price).abs()).collect();
        let rating_diffs: Vec<f64> =
            candidates.iter().map(|product| (product.rating - reference.rating).abs()).collect();
        let max_price_diff = floored_max(&price_diffs);
        let max_rating_diff = floored_max(&rating_diffs);

        let mut scored: Vec<ScoredProduct<'a>> = candidates
            .iter()
            .zip(price_diffs.iter().zip(rating_diffs.iter()))
            .map(|(product, (price_diff, rating_diff))| {
                let price_sim = 1.0 - price_diff / max_price_diff;
                let rating_sim = 1.0 - rating_diff / max_rating_diff;
                let brand_sim = if product.brand == reference.brand { 1.0 } else { 0.0 };
                let similarity = self.weights.price * price_sim
                    + self.weights.rating * rating_sim
                    + self.weights.brand * brand_sim;
                ScoredProduct::new(product, similarity)
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        scored
    }
}

fn floored_max(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max
    } else {
        MIN_DIFF_DIVISOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn catalog(products: Vec<Product>) -> ProductCatalog {
        ProductCatalog::new(products).expect("fixture catalog should be valid")
    }

    fn ids(ranked: &[ScoredProduct<'_>]) -> Vec<i64> {
        ranked.iter().map(|entry| entry.product.id.0).collect()
    }

    #[test]
    fn unknown_reference_returns_empty() {
        let catalog = catalog(vec![Product::new(1, "Phones", "Nova", 500.0, 4.0, 10)]);

        assert!(SimilarityScorer::new().similar_to(&catalog, ProductId(42), 5).is_empty());
    }

    #[test]
    fn reference_alone_in_category_returns_empty() {
        let catalog = catalog(vec![
            Product::new(1, "Phones", "Nova", 500.0, 4.0, 10),
            Product::new(2, "Tablets", "Nova", 500.0, 4.0, 10),
        ]);

        assert!(SimilarityScorer::new().similar_to(&catalog, ProductId(1), 5).is_empty());
    }

    #[test]
    fn single_identical_peer_uses_unit_divisors() {
        let catalog = catalog(vec![
            Product::new(1, "Phones", "Nova", 500.0, 4.0, 10),
            Product::new(2, "Phones", "Nova", 500.0, 4.0, 99),
        ]);

        let ranked = SimilarityScorer::new().similar_to(&catalog, ProductId(1), 5);

        assert_eq!(ids(&ranked), vec![2]);
        assert!((ranked[0].score - 1.0).abs() < EPSILON);
    }

    #[test]
    fn single_peer_with_differences_scores_only_on_brand() {
        let catalog = catalog(vec![
            Product::new(1, "Phones", "Nova", 500.0, 4.0, 10),
            Product::new(2, "Phones", "Nova", 650.0, 3.5, 10),
        ]);

        let ranked = SimilarityScorer::new().similar_to(&catalog, ProductId(1), 5);

        // the lone peer defines the maximum difference on both axes
        assert!((ranked[0].score - 0.3).abs() < EPSILON);
    }

    #[test]
    fn zero_price_spread_falls_back_to_unit_divisor() {
        let catalog = catalog(vec![
            Product::new(1, "Phones", "Nova", 500.0, 4.0, 10),
            Product::new(2, "Phones", "Zen", 500.0, 4.5, 10),
            Product::new(3, "Phones", "Zen", 500.0, 4.0, 10),
        ]);

        let ranked = SimilarityScorer::new().similar_to(&catalog, ProductId(1), 5);

        // price diffs are all zero so the divisor falls back to one
        assert_eq!(ids(&ranked), vec![3, 2]);
        assert!((ranked[0].score - 0.7).abs() < EPSILON);
        assert!((ranked[1].score - 0.3).abs() < EPSILON);
    }

    #[test]
    fn combines_price_rating_and_brand() {
        let catalog = catalog(vec![
            Product::new(1, "Laptops", "Orbit", 1000.0, 4.0, 10),
            Product::new(2, "Laptops", "Acme", 1000.0, 4.0, 10),
            Product::new(3, "Laptops", "Orbit", 1400.0, 3.0, 10),
            Product::new(4, "Laptops", "Orbit", 1200.0, 4.0, 10),
            Product::new(5, "Phones", "Orbit", 1000.0, 4.0, 10),
        ]);

        let ranked = SimilarityScorer::new().similar_to(&catalog, ProductId(1), 10);

        // id 4: 0.3 * 0.5 + 0.4 * 1.0 + 0.3 = 0.85
        // id 2: 0.3 * 1.0 + 0.4 * 1.0 + 0.0 = 0.70
        // id 3: 0.3 * 0.0 + 0.4 * 0.0 + 0.3 = 0.30
        assert_eq!(ids(&ranked), vec![4, 2, 3]);
        assert!((ranked[0].score - 0.85).abs() < EPSILON);
        assert!((ranked[1].score - 0.70).abs() < EPSILON);
        assert!((ranked[2].score - 0.30).abs() < EPSILON);
    }

    #[test]
    fn ties_keep_catalog_order_and_limit_truncates() {
        let catalog = catalog(vec![
            Product::new(1, "Phones", "Nova", 500.0, 4.0, 10),
            Product::new(7, "Phones", "Zen", 600.0, 4.0, 10),
            Product::new(3, "Phones", "Zen", 400.0, 4.0, 10),
            Product::new(5, "Phones", "Zen", 600.0, 4.0, 10),
        ]);
        let scorer = SimilarityScorer::new();

        assert_eq!(ids(&scorer.similar_to(&catalog, ProductId(1), 10)), vec![7, 3, 5]);
        assert_eq!(ids(&scorer.similar_to(&catalog, ProductId(1), 2)), vec![7, 3]);
    }

    #[test]
    fn non_positive_limit_returns_empty() {
        let catalog = catalog(vec![
            Product::new(1, "Phones", "Nova", 500.0, 4.0, 10),
            Product::new(2, "Phones", "Nova", 510.0, 4.0, 10),
        ]);
        let scorer = SimilarityScorer::new();

        assert!(scorer.similar_to(&catalog, ProductId(1), 0).is_empty());
        assert!(scorer.similar_to(&catalog, ProductId(1), -3).is_empty());
    }

    #[test]
    fn repeated_queries_are_identical() {
        let catalog = catalog(vec![
            Product::new(1, "Phones", "Nova", 500.0, 4.0, 10),
            Product::new(2, "Phones", "Zen", 520.0, 4.1, 10),
            Product::new(3, "Phones", "Nova", 480.0, 3.2, 10),
        ]);
        let scorer = SimilarityScorer::new();

        assert_eq!(scorer.similar_to(&catalog, ProductId(1), 5), scorer.similar_to(&catalog, ProductId(1), 5));
    }
}
