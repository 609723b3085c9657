//! Query facade over one catalog snapshot

use std::sync::Arc;

use tracing::debug;

use super::recommend::RecommendationScorer;
use super::similarity::SimilarityScorer;
use super::types::*;
use crate::catalog::ProductCatalog;
use crate::domain::filter::FilterSpec;
use crate::domain::product::{Product, ProductId};

/// Filters and ranks against a shared, immutable catalog. Cloning is cheap and
/// every clone reads the same snapshot.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<ProductCatalog>,
    recommender: RecommendationScorer,
    similarity: SimilarityScorer,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<ProductCatalog>) -> Self {
        Self {
            catalog,
            recommender: RecommendationScorer::new(),
            similarity: SimilarityScorer::new(),
        }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.catalog.get(id)
    }

    /// Narrow the catalog with `filters`, then rank what remains.
    pub fn recommend(&self, filters: &FilterSpec, sort_by: SortBy, limit: usize) -> Vec<ScoredProduct<'_>> {
        let candidates = self.catalog.filter(filters);
        debug!(
            event_name = "ranking.recommend.candidates",
            candidate_count = candidates.len(),
            sort_by = sort_by.as_str(),
            limit,
            "filtered recommendation candidates"
        );
        self.recommender.recommend(&candidates, sort_by, limit)
    }

    pub fn similar_to(&self, reference_id: ProductId, limit: i64) -> Vec<ScoredProduct<'_>> {
        let ranked = self.similarity.similar_to(&self.catalog, reference_id, limit);
        debug!(
            event_name = "ranking.similar.ranked",
            reference_id = reference_id.0,
            result_count = ranked.len(),
            limit,
            "ranked similar products"
        );
        ranked
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::RecommendationEngine;
    use crate::catalog::ProductCatalog;
    use crate::domain::filter::FilterSpec;
    use crate::domain::product::{Product, ProductId};
    use crate::ranking::SortBy;

    fn engine() -> RecommendationEngine {
        let catalog = ProductCatalog::new(vec![
            Product::new(1, "Headphones", "Pulse", 199.0, 4.7, 820),
            Product::new(2, "Headphones", "Echo", 89.0, 4.1, 1300),
            Product::new(3, "Speakers", "Pulse", 149.0, 4.4, 240),
            Product::new(4, "Headphones", "Pulse", 349.0, 4.9, 95),
            Product::new(5, "Headphones", "Echo", 49.0, 3.6, 40),
        ])
        .expect("fixture catalog should be valid");
        RecommendationEngine::new(Arc::new(catalog))
    }

    #[test]
    fn normalization_follows_the_filtered_set() {
        let engine = engine();
        let headphones = FilterSpec::new().with_category("Headphones");
        let pulse_only = headphones.clone().with_brands(["Pulse"]);

        let wide = engine.recommend(&headphones, SortBy::Score, 10);
        let narrow = engine.recommend(&pulse_only, SortBy::Score, 10);

        let wide_score = wide.iter().find(|entry| entry.product.id == ProductId(1)).map(|e| e.score);
        let narrow_score =
            narrow.iter().find(|entry| entry.product.id == ProductId(1)).map(|e| e.score);
        assert_eq!(narrow.len(), 2);
        assert_ne!(wide_score, narrow_score);
    }

    #[test]
    fn recommend_with_no_matches_is_empty() {
        let engine = engine();
        let spec = FilterSpec::new().with_category("Cameras");

        assert!(engine.recommend(&spec, SortBy::Rating, 10).is_empty());
    }

    #[test]
    fn queries_are_idempotent() {
        let engine = engine();
        let spec = FilterSpec::new().with_price_bounds(Some(50.0), Some(300.0));

        assert_eq!(engine.recommend(&spec, SortBy::Score, 3), engine.recommend(&spec, SortBy::Score, 3));
        assert_eq!(engine.similar_to(ProductId(1), 5), engine.similar_to(ProductId(1), 5));
    }

    #[test]
    fn similar_to_stays_inside_the_category() {
        let engine = engine();

        let similar = engine.similar_to(ProductId(1), 5);

        assert_eq!(similar.len(), 3);
        assert!(similar.iter().all(|entry| entry.product.category == "Headphones"));
        assert!(similar.iter().all(|entry| entry.product.id != ProductId(1)));
        assert_eq!(similar[0].product.id, ProductId(4));
    }
}
