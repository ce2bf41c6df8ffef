//! Router configuration - centralized route definitions
//!
//! Routes are organized by domain and split into public (no auth) and
//! protected (auth required). The auth middleware and rate limiter are
//! applied by the caller.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::state::AppStateInner;
use super::{articles, extract, health, summary, todos};

/// Application state type alias
pub type AppState = Arc<AppStateInner>;

/// Build the public routes (no authentication required)
///
/// Health checks stay reachable for probes; the board surface has no user
/// accounts and ships unauthenticated by design of the original board.
pub fn build_public_routes(state: AppState) -> Router {
    Router::new()
        // =================================================================
        // HEALTH
        // =================================================================
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        // =================================================================
        // ARTICLE BOARD
        // =================================================================
        .route("/articles", get(articles::list_articles))
        .route("/articles/new", get(articles::new_article_form))
        .route("/articles/create", post(articles::create_article))
        .route("/articles/update", post(articles::update_article))
        .route("/articles/{id}", get(articles::show_article))
        .route("/articles/{id}/edit", get(articles::edit_article_form))
        .route("/articles/{id}/delete", get(articles::delete_article))
        // =================================================================
        // STATE
        // =================================================================
        .with_state(state)
}

/// Build the protected API routes (authentication required)
pub fn build_protected_routes(state: AppState) -> Router {
    Router::new()
        // =================================================================
        // AI ENDPOINTS
        // =================================================================
        .route("/api/ai/extract", post(extract::extract_todo))
        .route("/api/ai/summary", post(summary::summarize_todos))
        // =================================================================
        // TODO CRUD
        // =================================================================
        .route("/api/todos/list", post(todos::list_todos))
        .route("/api/todos/add", post(todos::create_todo))
        .route("/api/todos/update", post(todos::update_todo))
        .route("/api/todos/toggle", post(todos::toggle_todo))
        .route("/api/todos/delete", post(todos::delete_todo))
        // =================================================================
        // STATE
        // =================================================================
        .with_state(state)
}

/// Build the complete router (public + protected, middleware applied by main)
pub fn build_router(state: AppState) -> Router {
    build_public_routes(state.clone()).merge(build_protected_routes(state))
}
