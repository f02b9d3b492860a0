//! Error responses for the HTTP routes.

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::search_index::SearchIndexError;

#[derive(Debug)]
pub struct ApiError(pub anyhow::Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<SearchIndexError>() {
            Some(SearchIndexError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Some(SearchIndexError::Status { .. }) => StatusCode::BAD_GATEWAY,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!("request failed ({}): {:#}", status, self.0);
        (status, Body::from(self.0.to_string())).into_response()
    }
}
