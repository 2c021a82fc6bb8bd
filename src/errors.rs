// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the cart backend. Each variant maps to a distinct HTTP
/// response so the adapter layer never has to inspect strings.
#[derive(Debug, Error)]
pub enum AppError {
  /// Required field missing or a field value outside its domain. Client error.
  #[error("Validation error: {0}")]
  Validation(String),

  /// Item absent, or owned by a different user's cart. The two cases are
  /// deliberately indistinguishable so callers cannot probe for another
  /// user's item ids.
  #[error("{0}")]
  NotFound(String),

  /// Concurrent cart creation raced for the same user. Stores resolve this
  /// internally by re-reading the winning row, so the adapter should never
  /// see it in practice.
  #[error("Conflict: {0}")]
  Conflict(String),

  /// Underlying persistence failure (connectivity, unexpected constraint
  /// violations). Never retried by the service.
  #[error("Store error: {0}")]
  Store(#[from] sqlx::Error),

  #[error("Configuration error: {0}")]
  Config(String),

  /// Invariant breakage and everything else that has no better home.
  #[error("Internal error: {0}")]
  Internal(String),
}

impl AppError {
  /// The one message the not-found policy exposes for item lookups,
  /// regardless of whether the item never existed or belongs to someone
  /// else's cart.
  pub fn item_not_found() -> Self {
    AppError::NotFound("Item not found in cart".to_string())
  }
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in code that uses `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      // Already covered by `From<sqlx::Error>`; unwrap the anyhow layer.
      match err.downcast::<sqlx::Error>() {
        Ok(sqlx_err) => AppError::Store(sqlx_err),
        Err(other) => AppError::Internal(other.to_string()),
      }
    } else {
      AppError::Internal(err.to_string())
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it is turned into a response.
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({ "error": m })),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({ "error": m })),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({ "error": m })),
      AppError::Store(e) => HttpResponse::InternalServerError()
        .json(json!({ "error": "Internal server error", "message": e.to_string() })),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({ "error": "Configuration issue", "message": m }))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({ "error": "Internal server error", "message": m }))
      }
    }
  }
}

/// Result type alias used throughout the crate.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
