use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use recommender_core::ranking::RecommendationEngine;
use serde::Serialize;
use tracing::warn;

#[derive(Clone)]
pub struct HealthState {
    engine: RecommendationEngine,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(engine: RecommendationEngine) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { engine })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.engine);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "recommender-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    if !ready {
        warn!(event_name = "system.health.degraded", "health check reported an empty catalog");
    }

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(engine: &RecommendationEngine) -> HealthCheck {
    let catalog = engine.catalog();
    if catalog.is_empty() {
        HealthCheck { status: "degraded", detail: "catalog holds no products".to_string() }
    } else {
        HealthCheck {
            status: "ready",
            detail: format!(
                "{} products across {} categories",
                catalog.len(),
                catalog.list_categories().len()
            ),
        }
    }
}
