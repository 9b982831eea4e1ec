use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{CreateMealRequest, CreatedMealResponse},
    repo_types::{Meal, MealId},
};
use crate::state::AppState;

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/:id", get(get_meal).delete(delete_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(State(state): State<AppState>) -> Json<Vec<Meal>> {
    let planner = state.planner.read().await;
    Json(planner.catalog().list().to_vec())
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_meal(
    State(state): State<AppState>,
    Json(body): Json<CreateMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<CreatedMealResponse>), (StatusCode, String)> {
    let mut planner = state.planner.write().await;
    let Some(id) = planner.create_meal(&body.name, body.ingredients) else {
        warn!("meal rejected");
        return Err((
            StatusCode::BAD_REQUEST,
            "A meal needs a name and at least one ingredient".into(),
        ));
    };

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/meals/{}", id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(CreatedMealResponse { id })))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<MealId>,
) -> Result<Json<Meal>, (StatusCode, String)> {
    let planner = state.planner.read().await;
    planner
        .catalog()
        .get_meal(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Meal not found".into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<MealId>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut planner = state.planner.write().await;
    match planner.remove_meal(&id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "Meal not found".into())),
    }
}
