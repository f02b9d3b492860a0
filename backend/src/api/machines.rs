//! Single-machine detail lookup.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::api::AppState;
use crate::api::error::ApiError;

pub async fn get_machine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    info!("Fetching machine: {}", id);
    match state.client.get_record(&id).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok((StatusCode::NOT_FOUND, format!("machine {id} not found")).into_response()),
    }
}
