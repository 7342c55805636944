use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{request_id_middleware, make_span_with_request_id};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::homepage))
        .route("/health", get(handlers::health_check))
        // Aggregation queries
        .route("/developer", get(handlers::developer))
        .route("/userdata", get(handlers::userdata))
        .route("/UserForGenre", get(handlers::user_for_genre))
        .route("/best_developer_year", get(handlers::best_developer_year))
        .route(
            "/developer_reviews_analysis",
            get(handlers::developer_reviews_analysis),
        )
        // Recommenders
        .route("/recommendation_user", get(handlers::recommendation_user))
        .route("/recommendation_game", get(handlers::recommendation_game))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
