//! API error type and [`axum::response::IntoResponse`] implementation.

use std::error::Error as StdError;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
  pub error: String,
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// One of the demographic lookups failed; nothing was persisted.
  #[error("enrichment error: {0}")]
  Enrichment(#[source] Box<dyn StdError + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error.
  ///
  /// Walks the source chain looking for a [`userdir_core::Error`] so that
  /// not-found and format failures keep their meaning across any backend.
  pub fn store<E>(err: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    let core = std::iter::successors(
      Some(&err as &(dyn StdError + 'static)),
      |&e| e.source(),
    )
    .find_map(|e| e.downcast_ref::<userdir_core::Error>());

    match core {
      Some(core) => ApiError::from_core(core),
      None => ApiError::Store(Box::new(err)),
    }
  }

  fn from_core(err: &userdir_core::Error) -> Self {
    match err {
      userdir_core::Error::UserNotFound(_) => ApiError::NotFound(err.to_string()),
      userdir_core::Error::Format { .. } => ApiError::BadRequest(err.to_string()),
    }
  }
}

impl From<userdir_core::Error> for ApiError {
  fn from(err: userdir_core::Error) -> Self { ApiError::from_core(&err) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Enrichment(e) => {
        tracing::warn!(error = %e, "enrichment failed");
        (StatusCode::BAD_GATEWAY, e.to_string())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(ErrorBody { error: message })).into_response()
  }
}
