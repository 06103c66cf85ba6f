//! Logged-in pages. Each returns its view-model as JSON.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::device::ViewVariant;
use crate::session::Session;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// `mobile` or `desktop`, overriding user-agent detection
    pub device: Option<String>,
    /// Dashboard admin mode switch: `true` / `false`
    pub admin: Option<String>,
}

impl PageQuery {
    fn variant(&self, headers: &HeaderMap) -> ViewVariant {
        ViewVariant::from_headers(headers, self.device.as_deref())
    }
}

/// Resolve `?admin=` for the dashboard and remember the choice.
/// Only admins can turn it on; no parameter means off for this render.
async fn resolve_admin_mode(state: &AppState, session: &Session, requested: Option<&str>) -> bool {
    if !session.is_admin {
        return false;
    }

    let enable = match requested {
        Some("true") => true,
        Some("false") => false,
        _ => return false,
    };

    state
        .sessions
        .update(&session.id, |s| s.admin_mode = enable)
        .await;
    tracing::debug!(enable, "Admin mode set from dashboard");
    enable
}

pub async fn main_page(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    let variant = query.variant(&headers);
    let admin_mode = resolve_admin_mode(&state, &session, query.admin.as_deref()).await;

    let ledger = state.ledger.read().await;
    Json(views::dashboard(&ledger, &variant, admin_mode)).into_response()
}

pub async fn accounts(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    let variant = query.variant(&headers);
    let admin_mode = session.is_admin && session.admin_mode;

    let ledger = state.ledger.read().await;
    Json(views::accounts(&ledger, &variant, admin_mode)).into_response()
}

pub async fn transfers(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    let variant = query.variant(&headers);
    let ledger = state.ledger.read().await;
    Json(views::transfers(&ledger, &variant)).into_response()
}

async fn simple(
    state: &AppState,
    query: &PageQuery,
    headers: &HeaderMap,
    title: &str,
    page_id: &'static str,
) -> Response {
    let variant = query.variant(headers);
    let ledger = state.ledger.read().await;
    Json(views::simple_page(&ledger, &variant, title, page_id)).into_response()
}

pub async fn mortgages(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    simple(&state, &query, &headers, "Mortgages and Loans", "mortgages").await
}

pub async fn buzon(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    simple(&state, &query, &headers, "Buzón", "buzon").await
}

pub async fn gestor(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    simple(&state, &query, &headers, "Gestor", "gestor").await
}

pub async fn admin_panel(State(state): State<AppState>) -> Response {
    let ledger = state.ledger.read().await;
    Json(views::admin_panel(&ledger)).into_response()
}
