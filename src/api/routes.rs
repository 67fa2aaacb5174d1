use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::request_id_middleware;

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog pass-throughs
        .route("/movies/trending", get(handlers::trending))
        .route("/movies/search", get(handlers::search))
        .route("/movies/discover", get(handlers::discover))
        .route("/movies/:id", get(handlers::movie_details))
        .route("/movies/:id/reviews", get(handlers::reviews))
        .route("/genres", get(handlers::genres))
        // Preference tracker
        .route("/history", get(handlers::get_history))
        .route("/history", post(handlers::record_view))
        .route("/watchlist", get(handlers::get_watchlist))
        .route("/watchlist", post(handlers::add_to_watchlist))
        .route(
            "/watchlist/:id",
            get(handlers::watchlist_contains).delete(handlers::remove_from_watchlist),
        )
        // Recommendation ranker
        .route("/recommendations", get(handlers::recommendations))
        // Identity
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
