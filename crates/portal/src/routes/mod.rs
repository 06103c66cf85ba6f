//! HTTP routes for the portal.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod api;
mod auth;
mod error;
mod guard;
mod health;
mod pages;


/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/metrics", get(health::metrics))

        // Login flows
        .route("/", get(auth::login_page))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/admin-login", get(auth::admin_login_page).post(auth::admin_login))
        .route("/admin-logout", get(auth::admin_logout))

        .merge(user_pages(state.clone()))
        .merge(admin_pages(state.clone()))
        .nest("/api", api_routes(state.clone()))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pages behind the user login
fn user_pages(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/main-page", get(pages::main_page))
        .route("/accounts", get(pages::accounts))
        .route("/transfers", get(pages::transfers))
        .route("/mortgages", get(pages::mortgages))
        .route("/buzon", get(pages::buzon))
        .route("/gestor", get(pages::gestor))
        .route_layer(middleware::from_fn_with_state(state, guard::require_user))
}

fn admin_pages(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin-panel", get(pages::admin_panel))
        .route_layer(middleware::from_fn_with_state(state, guard::require_admin_page))
}

/// JSON API. Everything but `/test` requires an admin session.
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(api::list_users).post(api::create_user))
        .route("/users/{id}", put(api::update_user).delete(api::delete_user))
        .route("/accounts", get(api::list_accounts).post(api::create_account))
        .route("/accounts/{id}", put(api::update_account).delete(api::delete_account))
        .route("/cards", get(api::list_cards).post(api::create_card))
        .route("/cards/{id}", put(api::update_card).delete(api::delete_card))
        .route("/transactions", get(api::list_transactions).post(api::create_transaction))
        .route(
            "/transactions/{id}",
            put(api::update_transaction).delete(api::delete_transaction),
        )
        .route("/currencies", get(api::list_currencies))
        .route("/update-field", put(api::update_field))
        .route("/exit-admin-mode", post(auth::exit_admin_mode))
        .route("/toggle-admin-mode", post(auth::toggle_admin_mode))
        .route_layer(middleware::from_fn_with_state(state, guard::require_admin_api))
        .route("/test", get(health::api_test))
}
