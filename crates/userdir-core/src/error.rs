//! Error types for `userdir-core`.

use thiserror::Error;

use crate::user::UserId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(UserId),

  /// A patch value has the wrong shape or type.
  #[error("wrong format for {field}: {reason}")]
  Format {
    field:  &'static str,
    reason: String,
  },
}

impl Error {
  pub(crate) fn format(field: &'static str, reason: impl Into<String>) -> Self {
    Error::Format { field, reason: reason.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
