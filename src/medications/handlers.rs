use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use super::repo_types::{Medication, MedicationError, MedicationId, MedicationPatch, NewMedication};
use crate::state::AppState;

pub fn medication_routes() -> Router<AppState> {
    Router::new()
        .route("/medications", get(list_medications).post(add_medication))
        .route(
            "/medications/:id",
            get(get_medication)
                .patch(update_medication)
                .delete(delete_medication),
        )
}

fn error_response(e: MedicationError) -> (StatusCode, String) {
    let status = match e {
        MedicationError::NotFound(_) => StatusCode::NOT_FOUND,
        MedicationError::BlankName | MedicationError::BlankMeasurement => StatusCode::BAD_REQUEST,
    };
    (status, e.to_string())
}

#[instrument(skip(state))]
pub async fn list_medications(State(state): State<AppState>) -> Json<Vec<Medication>> {
    let list = state.medications.read().await;
    Json(list.list().to_vec())
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn add_medication(
    State(state): State<AppState>,
    Json(body): Json<NewMedication>,
) -> Result<(StatusCode, HeaderMap, Json<Medication>), (StatusCode, String)> {
    let mut list = state.medications.write().await;
    let med = list.add(body).map_err(|e| {
        warn!(error = %e, "medication rejected");
        error_response(e)
    })?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/api/v1/medications/{}", med.id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(med.clone())))
}

#[instrument(skip(state))]
pub async fn get_medication(
    State(state): State<AppState>,
    Path(id): Path<MedicationId>,
) -> Result<Json<Medication>, (StatusCode, String)> {
    let list = state.medications.read().await;
    list.get(&id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Medication not found".into()))
}

#[instrument(skip(state, body))]
pub async fn update_medication(
    State(state): State<AppState>,
    Path(id): Path<MedicationId>,
    Json(body): Json<MedicationPatch>,
) -> Result<Json<Medication>, (StatusCode, String)> {
    let mut list = state.medications.write().await;
    list.update(&id, body)
        .map(|med| Json(med.clone()))
        .map_err(error_response)
}

#[instrument(skip(state))]
pub async fn delete_medication(
    State(state): State<AppState>,
    Path(id): Path<MedicationId>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut list = state.medications.write().await;
    match list.remove(&id) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err((StatusCode::NOT_FOUND, "Medication not found".into())),
    }
}
