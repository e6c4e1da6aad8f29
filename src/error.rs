//! HTTP-facing error type.
//!
//! Every failure leaves the API as `{ "error": { code, message, details? } }`.
//! Field validation carries the per-field map in `details`; upstream model
//! failures are logged in full but reported to the client as a summary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::export::ExportError;
use crate::openai::GenerationError;
use crate::validate::FieldErrors;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
  pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
  pub code: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum ApiError {
  /// One or more request fields failed validation (422).
  #[error("validation failed: {0}")]
  Validation(FieldErrors),

  /// No model backend configured (503).
  #[error("curriculum generation is not configured")]
  GenerationDisabled,

  /// The model call failed or returned something unusable (502).
  #[error("curriculum generation failed: {0}")]
  Generation(GenerationError),

  /// Export rendering failed (500).
  #[error("export failed: {0}")]
  Export(#[from] ExportError),
}

impl From<FieldErrors> for ApiError {
  fn from(errors: FieldErrors) -> Self { ApiError::Validation(errors) }
}

impl From<GenerationError> for ApiError {
  fn from(err: GenerationError) -> Self {
    match err {
      GenerationError::Disabled => ApiError::GenerationDisabled,
      other => ApiError::Generation(other),
    }
  }
}

impl ApiError {
  fn status_and_code(&self) -> (StatusCode, &'static str) {
    match self {
      ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
      ApiError::GenerationDisabled => (StatusCode::SERVICE_UNAVAILABLE, "GENERATION_DISABLED"),
      ApiError::Generation(_) => (StatusCode::BAD_GATEWAY, "GENERATION_FAILED"),
      ApiError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED"),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, code) = self.status_and_code();

    let (message, details) = match &self {
      ApiError::Validation(errors) => (
        "Some fields need attention".to_string(),
        serde_json::to_value(errors).ok(),
      ),
      ApiError::Generation(e) => {
        error!(target: "curriculum", error = %e, "Curriculum generation failed");
        ("Curriculum generation failed. Please try again.".to_string(), None)
      }
      ApiError::GenerationDisabled => {
        warn!(target: "curriculum", "Generation requested but no model is configured");
        (self.to_string(), None)
      }
      ApiError::Export(e) => {
        error!(target: "curriculum", error = %e, "Export failed");
        ("Export failed".to_string(), None)
      }
    };

    let body = ErrorBody { error: ErrorDetail { code: code.to_string(), message, details } };
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::validate::Field;

  #[test]
  fn validation_maps_to_422_with_field_details() {
    let mut errors = FieldErrors::new();
    errors.insert(Field::Name, "Curriculum name is required");
    let err = ApiError::from(errors);
    let (status, code) = err.status_and_code();
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(code, "VALIDATION_ERROR");
  }

  #[test]
  fn disabled_generation_is_503() {
    let err = ApiError::from(GenerationError::Disabled);
    assert!(matches!(err, ApiError::GenerationDisabled));
    assert_eq!(err.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);
  }

  #[test]
  fn upstream_failure_is_502() {
    let err = ApiError::from(GenerationError::Upstream { status: 500, message: "boom".into() });
    assert_eq!(err.status_and_code(), (StatusCode::BAD_GATEWAY, "GENERATION_FAILED"));
  }
}
