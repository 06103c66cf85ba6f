//! Login, logout, and admin-mode endpoints.

use axum::{
    Extension, Form, Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use portal_common::constants::paths;

use super::error::ApiResult;
use super::pages::PageQuery;
use crate::captcha::{MonthPuzzle, PieceSelection};
use crate::device::ViewVariant;
use crate::session::{Session, clear_cookie, session_cookie};
use crate::state::AppState;
use crate::views::PageMeta;

/// Attach the session cookie to any response
fn with_session_cookie(state: &AppState, session_id: &str, response: impl IntoResponse) -> Response {
    let cookie = session_cookie(
        &state.config.session.cookie_name,
        session_id,
        state.config.session.ttl_secs,
    );
    ([(header::SET_COOKIE, cookie)], response).into_response()
}

fn without_session_cookie(state: &AppState, response: impl IntoResponse) -> Response {
    let cookie = clear_cookie(&state.config.session.cookie_name);
    ([(header::SET_COOKIE, cookie)], response).into_response()
}

#[derive(Debug, Serialize)]
pub struct LoginView {
    #[serde(flatten)]
    meta: PageMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Login page
pub async fn login_page(Query(query): Query<PageQuery>, headers: HeaderMap) -> Json<LoginView> {
    let variant = ViewVariant::from_headers(&headers, query.device.as_deref());
    Json(LoginView {
        meta: PageMeta::new("Iniciar sesión", "login", &variant),
        error: None,
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    userid: String,
    #[serde(default)]
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    if !state.config.auth.check_user(&form.userid, &form.password) {
        tracing::warn!(userid = %form.userid, "User login failed");
        let variant = ViewVariant::from_headers(&headers, query.device.as_deref());
        let view = LoginView {
            meta: PageMeta::new("Iniciar sesión", "login", &variant),
            error: Some("Incorrect credentials. Please try again.".into()),
        };
        return (StatusCode::UNAUTHORIZED, Json(view)).into_response();
    }

    let session = state
        .sessions
        .get_or_create(state.session_id(&headers).as_deref())
        .await;
    state.sessions.update(&session.id, |s| s.logged_in = true).await;

    tracing::info!(userid = %form.userid, "User logged in");
    with_session_cookie(&state, &session.id, Redirect::to(paths::MAIN_PAGE))
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = state.session_id(&headers) {
        state.sessions.destroy(&id).await;
    }
    without_session_cookie(&state, Redirect::to(paths::LOGIN))
}

#[derive(Debug, Serialize)]
pub struct AdminLoginView {
    #[serde(flatten)]
    meta: PageMeta,
    captcha: MonthPuzzle,
    instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Generate a fresh challenge and park its answer in the session
async fn issue_challenge(state: &AppState, session_id: &str) -> AdminLoginView {
    let puzzle = state.puzzle_generator.generate();
    let stored = state.puzzle_generator.to_stored(&puzzle);
    state
        .sessions
        .update(session_id, |s| s.pending_puzzle = Some(stored))
        .await;

    AdminLoginView {
        meta: PageMeta::standalone("Acceso Admin", "admin-login"),
        instructions: state.puzzle_generator.instructions(&puzzle),
        captcha: puzzle,
        error: None,
    }
}

pub async fn admin_login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state
        .sessions
        .get_or_create(state.session_id(&headers).as_deref())
        .await;

    if session.is_admin {
        return Redirect::to(paths::ADMIN_PANEL).into_response();
    }

    let view = issue_challenge(&state, &session.id).await;
    with_session_cookie(&state, &session.id, Json(view))
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    password: String,
    column1: Option<String>,
    column2: Option<String>,
    column3: Option<String>,
    /// `inline` lands on the dashboard in admin mode
    mode: Option<String>,
}

pub async fn admin_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AdminLoginForm>,
) -> Response {
    let session = state
        .sessions
        .get_or_create(state.session_id(&headers).as_deref())
        .await;

    let stored = state.sessions.take_puzzle(&session.id).await;
    let selection = PieceSelection {
        column1: form.column1,
        column2: form.column2,
        column3: form.column3,
    };
    let outcome = state.puzzle_verifier.verify(stored, &selection);
    let password_ok = state.config.auth.check_admin(&form.password);

    if password_ok && outcome.is_passed() {
        state
            .sessions
            .update(&session.id, |s| {
                s.is_admin = true;
                s.logged_in = true;
                s.pending_puzzle = None;
            })
            .await;

        tracing::info!("Admin logged in");
        let target = if form.mode.as_deref() == Some("inline") {
            paths::MAIN_PAGE_ADMIN
        } else {
            paths::ADMIN_PANEL
        };
        return with_session_cookie(&state, &session.id, Redirect::to(target));
    }

    tracing::warn!(password_ok, outcome = ?outcome, "Admin login failed");

    let mut message = String::from("Verification failed.");
    if !password_ok {
        message.push_str(" Incorrect password.");
    }
    if !outcome.is_passed() {
        message.push_str(" Incorrect captcha.");
    }
    message.push_str(" Please try again.");

    let view = AdminLoginView {
        error: Some(message),
        ..issue_challenge(&state, &session.id).await
    };
    with_session_cookie(&state, &session.id, (StatusCode::UNAUTHORIZED, Json(view)))
}

pub async fn admin_logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = state.session_id(&headers) {
        state.sessions.destroy(&id).await;
    }
    tracing::info!("Admin logged out");
    without_session_cookie(&state, Redirect::to(paths::MAIN_PAGE))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminModeResponse {
    success: bool,
    admin_mode: bool,
    message: &'static str,
}

async fn set_admin_mode(state: &AppState, session: &Session, enable: bool) -> AdminModeResponse {
    state
        .sessions
        .update(&session.id, |s| s.admin_mode = enable)
        .await;

    AdminModeResponse {
        success: true,
        admin_mode: enable,
        message: if enable {
            "Admin mode enabled"
        } else {
            "Admin mode disabled"
        },
    }
}

pub async fn exit_admin_mode(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<AdminModeResponse> {
    Json(set_admin_mode(&state, &session, false).await)
}

#[derive(Debug, Deserialize)]
pub struct ToggleAdminMode {
    enable: bool,
}

pub async fn toggle_admin_mode(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<ToggleAdminMode>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<Json<AdminModeResponse>> {
    let Json(request) = payload?;
    Ok(Json(set_admin_mode(&state, &session, request.enable).await))
}
