use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{RecordWeightRequest, WindowQuery},
    services::WeightEntry,
};
use crate::{date_key, state::AppState};

pub fn weight_routes() -> Router<AppState> {
    Router::new().route("/weight", get(list_weights).post(record_weight))
}

#[instrument(skip(state))]
pub async fn list_weights(
    State(state): State<AppState>,
    Query(q): Query<WindowQuery>,
) -> Json<Vec<WeightEntry>> {
    let log = state.weight.read().await;
    Json(log.window(q.range).to_vec())
}

#[instrument(skip(state))]
pub async fn record_weight(
    State(state): State<AppState>,
    Json(body): Json<RecordWeightRequest>,
) -> Result<(StatusCode, Json<WeightEntry>), (StatusCode, String)> {
    let mut log = state.weight.write().await;
    match log.record(date_key::today(), body.value, body.unit) {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry.clone()))),
        Err(e) => {
            warn!(error = %e, "weight rejected");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}
