use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::services::queries::{
    self, DeveloperRank, DeveloperYearStats, GenreTopUser, SentimentBreakdown, UserSummary,
};
use crate::services::recommender;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct DeveloperParams {
    pub developer: String,
}

#[derive(Debug, Deserialize)]
pub struct UserParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreParams {
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct YearParams {
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct GameParams {
    pub id: u32,
}

#[derive(Debug, Serialize)]
pub struct UserRecommendations {
    pub user_id: String,
    pub recommendations: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct SimilarGames {
    pub similar_games: Vec<String>,
}

fn require_non_empty(value: &str, name: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!(
            "parameter '{name}' must not be empty"
        )));
    }
    Ok(())
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Homepage pointing at the interactive docs
pub async fn homepage() -> Html<&'static str> {
    Html(
        "<html>\
           <head><title>Steam API</title></head>\
           <body>\
             <h1>Steam Video Game Queries API</h1>\
             <p>Read-only analytics and recommendations over the Steam dataset.</p>\
           </body>\
         </html>",
    )
}

/// Per-year release stats for a developer
pub async fn developer(
    State(state): State<AppState>,
    Query(params): Query<DeveloperParams>,
) -> AppResult<Json<BTreeMap<String, DeveloperYearStats>>> {
    require_non_empty(&params.developer, "developer")?;
    Ok(Json(queries::developer_stats(
        &state.datasets,
        &params.developer,
    )))
}

/// Spend, item count and recommend rate for a user
pub async fn userdata(
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> AppResult<Json<UserSummary>> {
    require_non_empty(&params.user_id, "user_id")?;
    Ok(Json(queries::user_summary(&state.datasets, &params.user_id)))
}

/// Top user by playtime within a genre
pub async fn user_for_genre(
    State(state): State<AppState>,
    Query(params): Query<GenreParams>,
) -> AppResult<Json<GenreTopUser>> {
    require_non_empty(&params.genre, "genre")?;
    Ok(Json(queries::top_user_for_genre(
        &state.datasets,
        &params.genre,
    )))
}

/// Top 3 developers by recommended reviews for a release year
pub async fn best_developer_year(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> Json<BTreeMap<String, DeveloperRank>> {
    Json(queries::best_developers_of_year(&state.datasets, params.year))
}

/// Negative/positive review counts for a developer
pub async fn developer_reviews_analysis(
    State(state): State<AppState>,
    Query(params): Query<DeveloperParams>,
) -> AppResult<Json<BTreeMap<String, SentimentBreakdown>>> {
    require_non_empty(&params.developer, "developer")?;
    let breakdown = queries::developer_reviews(&state.datasets, &params.developer);
    let mut body = BTreeMap::new();
    body.insert(params.developer, breakdown);
    Ok(Json(body))
}

/// User-based collaborative recommendations; unknown users get an empty
/// list, not an error
pub async fn recommendation_user(
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> AppResult<Json<UserRecommendations>> {
    require_non_empty(&params.user_id, "user_id")?;
    let recommendations = recommender::recommend_for_user(&state.datasets, &params.user_id);
    Ok(Json(UserRecommendations {
        user_id: params.user_id,
        recommendations,
    }))
}

/// Content-based similar titles; an unknown game id is a 404, distinct
/// from a game with no similar titles
pub async fn recommendation_game(
    State(state): State<AppState>,
    Query(params): Query<GameParams>,
) -> AppResult<Json<SimilarGames>> {
    let titles =
        recommender::recommend_similar_items(&state.datasets, params.id, state.sample_size)?
            .ok_or_else(|| {
                AppError::NotFound(format!("Game id '{}' not registered.", params.id))
            })?;
    Ok(Json(SimilarGames {
        similar_games: titles,
    }))
}
