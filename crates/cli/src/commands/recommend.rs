use clap::Args;
use recommender_core::domain::{filter::FilterSpec, product::Product};
use recommender_core::ranking::{SortBy, DEFAULT_RECOMMEND_LIMIT};
use serde::Serialize;

use super::{from_application_error, load_engine, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct RecommendArgs {
    #[arg(long, help = "Only products in this category")]
    pub category: Option<String>,
    #[arg(long = "brand", help = "Allowed brand; repeat for several")]
    pub brands: Vec<String>,
    #[arg(long, help = "Inclusive lower price bound")]
    pub min_price: Option<f64>,
    #[arg(long, help = "Inclusive upper price bound")]
    pub max_price: Option<f64>,
    #[arg(long, help = "Inclusive minimum rating")]
    pub min_rating: Option<f64>,
    #[arg(
        long,
        default_value = "score",
        help = "score | price_asc | price_desc | rating | reviews"
    )]
    pub sort_by: SortBy,
    #[arg(long, default_value_t = DEFAULT_RECOMMEND_LIMIT)]
    pub limit: usize,
}

impl Default for RecommendArgs {
    fn default() -> Self {
        Self {
            category: None,
            brands: Vec::new(),
            min_price: None,
            max_price: None,
            min_rating: None,
            sort_by: SortBy::default(),
            limit: DEFAULT_RECOMMEND_LIMIT,
        }
    }
}

impl RecommendArgs {
    pub fn filters(&self) -> FilterSpec {
        FilterSpec {
            category: self.category.clone(),
            brands: (!self.brands.is_empty()).then(|| self.brands.clone()),
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
        }
    }
}

#[derive(Debug, Serialize)]
struct Recommended<'a> {
    #[serde(flatten)]
    product: &'a Product,
    recommendation_score: f64,
}

#[derive(Debug, Serialize)]
struct RecommendReport<'a> {
    sort_by: SortBy,
    total: usize,
    filters_applied: &'a FilterSpec,
    products: Vec<Recommended<'a>>,
}

pub fn run(args: &RecommendArgs) -> CommandResult {
    let engine = match load_engine() {
        Ok(engine) => engine,
        Err(error) => return from_application_error("recommend", &error),
    };

    let filters = args.filters();
    let products: Vec<Recommended<'_>> = engine
        .recommend(&filters, args.sort_by, args.limit)
        .into_iter()
        .map(|entry| Recommended { product: entry.product, recommendation_score: entry.score })
        .collect();

    let report = RecommendReport {
        sort_by: args.sort_by,
        total: products.len(),
        filters_applied: &filters,
        products,
    };
    let message = format!("{} recommendation(s) ranked by {}", report.total, args.sort_by.as_str());

    CommandResult::success_with("recommend", message, &report)
}
