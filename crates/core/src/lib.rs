pub mod catalog;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod errors;
pub mod ranking;

pub use catalog::{PriceRange, ProductCatalog};
pub use dataset::{load_catalog, DatasetError};
pub use domain::filter::FilterSpec;
pub use domain::product::{Product, ProductId, SpecValue, Specs};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use ranking::{
    RecommendationEngine, RecommendationScorer, RecommendationWeights, ScoredProduct,
    SimilarityScorer, SimilarityWeights, SortBy,
};
