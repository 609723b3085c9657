use clap::Args;
use recommender_core::domain::product::{Product, ProductId};
use recommender_core::ranking::DEFAULT_SIMILAR_LIMIT;
use serde::Serialize;

use super::{from_application_error, load_engine, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct SimilarArgs {
    #[arg(long, help = "Reference product id")]
    pub id: i64,
    #[arg(long, default_value_t = DEFAULT_SIMILAR_LIMIT, allow_negative_numbers = true)]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
struct Similar<'a> {
    #[serde(flatten)]
    product: &'a Product,
    similarity_score: f64,
}

#[derive(Debug, Serialize)]
struct SimilarReport<'a> {
    reference_id: ProductId,
    total: usize,
    similar_products: Vec<Similar<'a>>,
}

/// An unknown reference id is not an error; it yields an empty list.
pub fn run(args: &SimilarArgs) -> CommandResult {
    let engine = match load_engine() {
        Ok(engine) => engine,
        Err(error) => return from_application_error("similar", &error),
    };

    let reference_id = ProductId(args.id);
    let similar_products: Vec<Similar<'_>> = engine
        .similar_to(reference_id, args.limit)
        .into_iter()
        .map(|entry| Similar { product: entry.product, similarity_score: entry.score })
        .collect();

    let message = match engine.get(reference_id) {
        Some(product) => format!(
            "{} product(s) similar to {} in {}",
            similar_products.len(),
            reference_id,
            product.category
        ),
        None => format!("product {reference_id} is not in the catalog"),
    };
    let report = SimilarReport { reference_id, total: similar_products.len(), similar_products };

    CommandResult::success_with("similar", message, &report)
}
