//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] fieldmap_core::Error),
}

impl From<fieldmap_core::Error> for ApiError {
  fn from(err: fieldmap_core::Error) -> Self {
    use fieldmap_core::Error as E;
    match err {
      E::CustomerNotFound(_)
      | E::VisitNotFound(_)
      | E::ServiceCallNotFound(_)
      | E::DeliveryNotFound(_)
      | E::FollowUpNotFound(_) => Self::NotFound(err.to_string()),
      E::AlreadyCompleted(_) => Self::Conflict(err.to_string()),
      E::Serialization(_) | E::Persistence(_) => Self::Store(err),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
