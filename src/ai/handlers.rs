use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    ArticlesQuery, HealthArticle, IngredientQuery, MedicationQuery, MedicationSuggestion,
    SearchRequest, SearchResult,
};
use crate::state::AppState;

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients/search", get(search_ingredients))
        .route("/search", post(search))
        .route("/search/medications", get(search_medications))
        .route("/articles", get(health_articles))
}

#[instrument(skip(state))]
pub async fn search_ingredients(
    State(state): State<AppState>,
    Query(q): Query<IngredientQuery>,
) -> Json<Vec<String>> {
    Json(state.ai.search_ingredients(&q.q).await)
}

#[instrument(skip(state))]
pub async fn search_medications(
    State(state): State<AppState>,
    Query(q): Query<MedicationQuery>,
) -> Json<Vec<MedicationSuggestion>> {
    Json(state.ai.search_medications(&q.q).await)
}

#[instrument(skip(state))]
pub async fn health_articles(
    State(state): State<AppState>,
    Query(q): Query<ArticlesQuery>,
) -> Json<Vec<HealthArticle>> {
    Json(state.ai.fetch_health_articles(&q.topic_list()).await)
}

#[instrument(skip(state, body))]
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<Option<SearchResult>>, (axum::http::StatusCode, String)> {
    let query = body.query.trim();
    if query.is_empty() {
        return Err((axum::http::StatusCode::BAD_REQUEST, "query is required".into()));
    }
    Ok(Json(state.ai.search(query, body.context.trim()).await))
}
