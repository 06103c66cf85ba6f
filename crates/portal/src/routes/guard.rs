//! Session guards.
//!
//! On success the caller's `Session` is inserted into the request
//! extensions for handlers to pick up with `Extension<Session>`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use portal_common::PortalError;
use portal_common::constants::paths;

use super::error::ApiError;
use crate::state::AppState;

/// User pages: logged-in session, else back to the login page
pub async fn require_user(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match state.current_session(request.headers()).await {
        Some(session) if session.logged_in => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        _ => {
            tracing::debug!(path = %request.uri().path(), "User auth failed");
            Redirect::to(paths::LOGIN).into_response()
        }
    }
}

/// Admin pages: admin session, else to the admin login
pub async fn require_admin_page(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.current_session(request.headers()).await {
        Some(session) if session.is_admin => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        _ => {
            tracing::debug!(path = %request.uri().path(), "Admin auth failed");
            Redirect::to(paths::ADMIN_LOGIN).into_response()
        }
    }
}

/// Admin API: admin session, else 401 JSON
pub async fn require_admin_api(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.current_session(request.headers()).await {
        Some(session) if session.is_admin => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        _ => {
            tracing::debug!(
                path = %request.uri().path(),
                method = %request.method(),
                "Admin API auth failed"
            );
            ApiError(PortalError::Unauthorized("admin session required".into())).into_response()
        }
    }
}
