//! REST API — router and handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db;
use crate::events::AlertRecord;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the full API router over the shared state.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/alerts", get(all_alerts))
        .route("/contracts/:id/alerts", get(contract_alerts))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ContractAlertsResponse {
    contract_id: String,
    count: usize,
    alerts: Vec<AlertRecord>,
}

#[derive(Serialize)]
struct AllAlertsResponse {
    count: usize,
    alerts: Vec<AlertRecord>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Collapse a database result into `200` + JSON body or `500` + error JSON.
fn json_or_500<T: Serialize>(result: crate::errors::Result<T>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(serde_json::json!(body))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!(ErrorResponse {
                error: e.to_string()
            })),
        )
            .into_response(),
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /contracts/:id/alerts` — all stored alerts for one contract
/// instance.
async fn contract_alerts(
    State(state): State<Arc<ApiState>>,
    Path(contract_id): Path<String>,
) -> Response {
    json_or_500(
        db::get_alerts_for_contract(&state.pool, &contract_id)
            .await
            .map(|alerts| ContractAlertsResponse {
                contract_id,
                count: alerts.len(),
                alerts,
            }),
    )
}

/// `GET /alerts` — all stored alerts across all watched contracts.
async fn all_alerts(State(state): State<Arc<ApiState>>) -> Response {
    json_or_500(db::get_all_alerts(&state.pool).await.map(|alerts| {
        AllAlertsResponse {
            count: alerts.len(),
            alerts,
        }
    }))
}
