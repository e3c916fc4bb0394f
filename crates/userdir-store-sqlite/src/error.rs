//! Error type for `userdir-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Domain-level failures, e.g. [`userdir_core::Error::UserNotFound`].
  #[error("core error: {0}")]
  Core(#[from] userdir_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored row could not be mapped back onto the domain model.
  #[error("invalid row: {0}")]
  InvalidRow(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
