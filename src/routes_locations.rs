// --------------------------------------------------
// Location record endpoints.
//
// - POST /input_adress : append one record, rewrite the data file
// - GET  /locations    : every stored record, in insertion order
// - GET  /health       : liveness + record count
// --------------------------------------------------

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;
use crate::models::{HealthResponse, INVALID_LOCATION, LocationRecord, MessageResponse};

// -----------------------------
// POST /input_adress
// -----------------------------
pub async fn input_address(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match body {
        Ok(body) => save_location(&state, &body).await,
        Err(rejection) => Err(ApiError::from(rejection)),
    };
    match result {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => e.into_response_with(state.debug),
    }
}

async fn save_location(state: &AppState, body: &[u8]) -> Result<MessageResponse, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ApiError::InvalidRequest(INVALID_LOCATION))?;
    let record = LocationRecord::from_submission(value)?;

    state.store.lock().await.append(record)?;

    Ok(MessageResponse {
        message: "Location saved.".to_string(),
    })
}

// -----------------------------
// GET /locations
// -----------------------------
pub async fn list_locations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.lock().await;
    Json(store.records().to_vec())
}

// -----------------------------
// GET /health
// -----------------------------
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let locations = state.store.lock().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        locations,
        started_at: state.started_at.to_rfc3339(),
    })
}
