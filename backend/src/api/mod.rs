//! API module
//!
//! Contains HTTP request handlers and the router that wires them together.

pub mod health;
pub mod middleware;
pub mod recommendations;

use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router
///
/// `DELETE /reset-database` is only mounted in the test environment.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/recommendations",
            get(recommendations::list_recommendations)
                .post(recommendations::create_recommendation),
        )
        .route(
            "/recommendations/random",
            get(recommendations::random_recommendation),
        )
        .route(
            "/recommendations/top/:amount",
            get(recommendations::top_recommendations),
        )
        .route(
            "/recommendations/:id",
            get(recommendations::get_recommendation),
        )
        .route(
            "/recommendations/:id/upvote",
            post(recommendations::upvote_recommendation),
        )
        .route(
            "/recommendations/:id/downvote",
            post(recommendations::downvote_recommendation),
        );

    if state.config.is_test() {
        app = app.route("/reset-database", delete(recommendations::reset_database));
    }

    // Middleware (order matters - request_id should be first)
    app.layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive()) // Front-end is served from another origin
        .with_state(state)
}
