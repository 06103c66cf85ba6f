//! Health check endpoints.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Basic health check (is the server running?)
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    ledger: bool,
}

/// Readiness check (can the ledger be read?)
pub async fn ready_check(
    State(state): State<AppState>,
) -> Result<Json<ReadyResponse>, StatusCode> {
    let ledger_ok = tokio::time::timeout(Duration::from_secs(1), state.ledger.read())
        .await
        .is_ok();

    if ledger_ok {
        Ok(Json(ReadyResponse {
            status: "ready",
            ledger: true,
        }))
    } else {
        tracing::warn!("Ledger lock not acquired within readiness timeout");
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

#[derive(Serialize)]
pub struct MetricsResponse {
    users: usize,
    accounts: usize,
    cards: usize,
    transactions: usize,
    sessions: usize,
    uptime_secs: u64,
}

/// Metrics endpoint (for monitoring)
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let (users, accounts, cards, transactions) = {
        let ledger = state.ledger.read().await;
        (
            ledger.list_users().len(),
            ledger.list_accounts().len(),
            ledger.list_cards().len(),
            ledger.list_transactions().len(),
        )
    };

    Json(MetricsResponse {
        users,
        accounts,
        cards,
        transactions,
        sessions: state.sessions.len().await,
        uptime_secs: state.uptime_secs(),
    })
}

#[derive(Serialize)]
pub struct ApiTestResponse {
    message: &'static str,
    timestamp: String,
}

/// Unauthenticated API liveness probe
pub async fn api_test() -> Json<ApiTestResponse> {
    Json(ApiTestResponse {
        message: "API is working",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
