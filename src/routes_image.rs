// --------------------------------------------------
// POST /input_image
// Writes an uploaded data-URL photo to the image directory.
//
// The file is named after the current record count and no record
// is appended here; /input_adress does that separately.
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
use crate::data_url::DataUrl;
use crate::error::ApiError;
use crate::models::ImageSavedResponse;

pub const NO_IMAGE: &str = "No image data provided.";

pub async fn input_image(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match body {
        Ok(body) => save_image(&state, &body).await,
        Err(rejection) => Err(ApiError::from(rejection)),
    };
    match result {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => e.into_response_with(state.debug),
    }
}

async fn save_image(state: &AppState, body: &[u8]) -> Result<ImageSavedResponse, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ApiError::InvalidRequest(NO_IMAGE))?;
    let Some(photo) = value.get("photo") else {
        return Err(ApiError::InvalidRequest(NO_IMAGE));
    };
    let Some(photo) = photo.as_str() else {
        return Err(ApiError::MalformedPayload("Image data must be a string.".to_string()));
    };

    let bytes = DataUrl::parse(photo)?.decode()?;

    // hold the lock so the count used for the name cannot move under us
    let store = state.store.lock().await;
    let path = store.save_image(&bytes)?;

    Ok(ImageSavedResponse {
        message: "Image saved.".to_string(),
        path: path.display().to_string(),
    })
}
