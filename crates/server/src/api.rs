//! JSON API for browsing and ranking the product catalog.
//!
//! Endpoints (all under `/api`):
//! - `GET  /categories`                 sorted category names
//! - `GET  /brands?category=`           sorted brand names
//! - `GET  /price-range?category=`      `{min, max}`, `null` when no data
//! - `GET  /products?page=&page_size=`  raw listing in load order
//! - `GET  /products/{id}`              single product or 404
//! - `GET  /products/{id}/similar`      same-category products by similarity
//! - `POST /recommend`                  filtered, ranked products
//!
//! `GET /` returns a service banner listing the endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use recommender_core::{
    catalog::PriceRange,
    config::{AppConfig, CorsConfig, PaginationConfig},
    domain::{filter::FilterSpec, product::Product, product::ProductId},
    errors::InterfaceError,
    ranking::{RecommendationEngine, ScoredProduct, SortBy, DEFAULT_RECOMMEND_LIMIT, DEFAULT_SIMILAR_LIMIT},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::health;

#[derive(Clone)]
pub struct ApiState {
    engine: RecommendationEngine,
    pagination: PaginationConfig,
}

impl ApiState {
    pub fn new(engine: RecommendationEngine, pagination: PaginationConfig) -> Self {
        Self { engine, pagination }
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// Paging parameters arrive as raw strings; anything unparseable falls back
/// to the defaults instead of failing the request.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SimilarQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RecommendRequest {
    #[serde(flatten)]
    pub filters: FilterSpec,
    pub sort_by: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BrandsResponse {
    pub brands: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Serialize)]
pub struct RecommendedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub recommendation_score: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub products: Vec<RecommendedProduct>,
    pub total: usize,
    pub filters_applied: FilterSpec,
}

#[derive(Debug, Serialize)]
pub struct SimilarProduct {
    #[serde(flatten)]
    pub product: Product,
    pub similarity_score: f64,
}

#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    pub similar_products: Vec<SimilarProduct>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    correlation_id: String,
}

/// Handler error rendered as `{error, detail?, correlation_id}`.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl From<InterfaceError> for ApiError {
    fn from(value: InterfaceError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self.0 {
            InterfaceError::BadRequest { message, .. } => Some(message.clone()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.0.user_message(),
            detail,
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(engine: RecommendationEngine, config: &AppConfig) -> Router {
    let api = Router::new()
        .route("/categories", get(list_categories))
        .route("/brands", get(list_brands))
        .route("/price-range", get(price_range))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}/similar", get(similar_products))
        .route("/recommend", post(recommend))
        .with_state(ApiState::new(engine.clone(), config.pagination.clone()))
        .merge(health::router(engine))
        .layer(cors_layer(&config.cors));

    Router::new().route("/", get(index)).nest("/api", api).layer(TraceLayer::new_for_http())
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let allow_origin = if cors.allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            cors.allowed_origins.iter().filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "E-Commerce Product Recommender API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "categories": "/api/categories",
            "brands": "/api/brands?category=<category>",
            "price_range": "/api/price-range?category=<category>",
            "products": "/api/products",
            "product_detail": "/api/products/<id>",
            "recommend": "/api/recommend (POST)",
            "similar": "/api/products/<id>/similar"
        }
    }))
}

pub async fn list_categories(State(state): State<ApiState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse { categories: state.engine.catalog().list_categories() })
}

pub async fn list_brands(
    State(state): State<ApiState>,
    Query(query): Query<CategoryQuery>,
) -> Json<BrandsResponse> {
    Json(BrandsResponse { brands: state.engine.catalog().list_brands(query.category.as_deref()) })
}

pub async fn price_range(
    State(state): State<ApiState>,
    Query(query): Query<CategoryQuery>,
) -> Json<PriceRange> {
    Json(state.engine.catalog().price_range(query.category.as_deref()))
}

pub async fn list_products(
    State(state): State<ApiState>,
    Query(query): Query<PageQuery>,
) -> Json<ProductPage> {
    let page = parse_or(query.page.as_deref(), 1).max(1);
    let page_size = parse_or(query.page_size.as_deref(), state.pagination.default_page_size)
        .clamp(1, state.pagination.max_page_size);
    let catalog = state.engine.catalog();

    Json(ProductPage {
        products: catalog.page(page, page_size).to_vec(),
        total: catalog.len(),
        page,
        page_size,
    })
}

pub async fn get_product(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let product = id.ok().and_then(|Path(id)| state.engine.get(ProductId(id)));

    match product {
        Some(product) => Ok(Json(product.clone())),
        None => {
            info!(
                event_name = "api.product.not_found",
                correlation_id = %correlation_id,
                "product lookup missed"
            );
            Err(InterfaceError::not_found("product is not in the catalog", correlation_id).into())
        }
    }
}

pub async fn similar_products(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
    Query(query): Query<SimilarQuery>,
) -> Result<Json<SimilarResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let Ok(Path(id)) = id else {
        return Err(InterfaceError::not_found("product id must be an integer", correlation_id).into());
    };
    let limit = parse_or(query.limit.as_deref(), DEFAULT_SIMILAR_LIMIT);

    let similar_products: Vec<SimilarProduct> = state
        .engine
        .similar_to(ProductId(id), limit)
        .into_iter()
        .map(|ScoredProduct { product, score }| SimilarProduct {
            product: product.clone(),
            similarity_score: score,
        })
        .collect();

    info!(
        event_name = "api.similar.served",
        correlation_id = %correlation_id,
        reference_id = id,
        limit,
        result_count = similar_products.len(),
        "similar products served"
    );

    let total = similar_products.len();
    Ok(Json(SimilarResponse { similar_products, total }))
}

pub async fn recommend(
    State(state): State<ApiState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let Json(request) = body.map_err(|rejection| {
        warn!(
            event_name = "api.recommend.rejected",
            correlation_id = %correlation_id,
            error = %rejection,
            "recommend request body rejected"
        );
        InterfaceError::bad_request(rejection.body_text(), correlation_id.clone())
    })?;

    let sort_by = match request.sort_by.as_deref() {
        None => SortBy::default(),
        Some(raw) => raw
            .parse::<SortBy>()
            .map_err(|message| InterfaceError::bad_request(message, correlation_id.clone()))?,
    };
    let limit = request.limit.unwrap_or(DEFAULT_RECOMMEND_LIMIT);

    let products: Vec<RecommendedProduct> = state
        .engine
        .recommend(&request.filters, sort_by, limit)
        .into_iter()
        .map(|ScoredProduct { product, score }| RecommendedProduct {
            product: product.clone(),
            recommendation_score: score,
        })
        .collect();

    info!(
        event_name = "api.recommend.served",
        correlation_id = %correlation_id,
        sort_by = sort_by.as_str(),
        limit,
        result_count = products.len(),
        "recommendations served"
    );

    let total = products.len();
    Ok(Json(RecommendResponse { products, total, filters_applied: request.filters }))
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, fallback: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(fallback)
}
