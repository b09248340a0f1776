use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::ValidationReport;

pub const NOT_FOUND_MESSAGE: &str = "Property not found";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum PropertyError {
    /// Bad or missing input; the message lists every broken rule.
    #[error("{0}")]
    Validation(String),

    #[error("Property not found")]
    NotFound,

    /// Never shown to the client as-is.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PropertyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PropertyError::Validation(_) => StatusCode::BAD_REQUEST,
            PropertyError::NotFound => StatusCode::NOT_FOUND,
            PropertyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            PropertyError::Validation(message) => message.clone(),
            PropertyError::NotFound => NOT_FOUND_MESSAGE.to_string(),
            PropertyError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl From<ValidationReport> for PropertyError {
    fn from(report: ValidationReport) -> Self {
        PropertyError::Validation(report.message())
    }
}

impl IntoResponse for PropertyError {
    fn into_response(self) -> Response {
        match &self {
            PropertyError::Internal(detail) => log::error!("Request failed: {}", detail),
            other => log::info!("Request rejected: {}", other),
        }
        (
            self.status_code(),
            Json(json!({ "success": false, "error": self.public_message() })),
        )
            .into_response()
    }
}
