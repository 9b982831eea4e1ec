use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{AssignRequest, AssignResponse, DayMealsResponse, MonthQuery, PlannedDaysResponse},
    repo_types::MealSlot,
};
use crate::{
    ai::dto::SearchResult,
    date_key::{self, DateKey},
    planner::DailySummary,
    state::AppState,
};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plan", get(list_planned_days))
        .route("/plan/:date", get(get_day))
        .route("/plan/:date/summary", get(get_summary))
        .route("/plan/:date/articles", get(get_articles))
        .route("/plan/:date/slots/:slot", put(assign_slot).delete(unassign_slot))
}

#[instrument(skip(state))]
pub async fn list_planned_days(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<PlannedDaysResponse>, (StatusCode, String)> {
    let (year, month) = match q.month.as_deref() {
        Some(raw) => date_key::parse_month(raw)
            .ok_or((StatusCode::BAD_REQUEST, "month must be YYYY-MM".to_string()))?,
        None => {
            let today = date_key::today().date();
            (today.year(), today.month())
        }
    };
    let planner = state.planner.read().await;
    Ok(Json(PlannedDaysResponse {
        month: format!("{:04}-{:02}", year, u8::from(month)),
        days: planner.plan().days_with_meals(year, month),
    }))
}

#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<DateKey>,
) -> Json<DayMealsResponse> {
    let planner = state.planner.read().await;
    Json(DayMealsResponse {
        date,
        meals: planner.day_meals(date),
    })
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(date): Path<DateKey>,
) -> Json<DailySummary> {
    let planner = state.planner.read().await;
    Json(planner.summarize(date))
}

#[instrument(skip(state))]
pub async fn get_articles(
    State(state): State<AppState>,
    Path(date): Path<DateKey>,
) -> Json<Option<SearchResult>> {
    // lock released before the AI call
    let ingredients = state.planner.read().await.day_ingredients(date);
    Json(state.ai.fetch_recipe_articles(&ingredients).await)
}

#[instrument(skip(state, body))]
pub async fn assign_slot(
    State(state): State<AppState>,
    Path((date, slot)): Path<(DateKey, MealSlot)>,
    Json(body): Json<AssignRequest>,
) -> Result<Json<AssignResponse>, (StatusCode, String)> {
    let mut planner = state.planner.write().await;
    if planner.catalog().get_meal(&body.meal_id).is_none() {
        warn!(meal_id = %body.meal_id, "assign to unknown meal");
        return Err((StatusCode::NOT_FOUND, "Meal not found".into()));
    }
    let replaced = planner.assign(date, slot, body.meal_id.clone());
    Ok(Json(AssignResponse {
        date,
        meal_id: body.meal_id,
        replaced,
    }))
}

#[instrument(skip(state))]
pub async fn unassign_slot(
    State(state): State<AppState>,
    Path((date, slot)): Path<(DateKey, MealSlot)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut planner = state.planner.write().await;
    match planner.unassign(date, slot) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "Nothing planned for that slot".into())),
    }
}
