//! Error type for `userdir-enrich`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("wrong http status {status} from {url}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  /// The service answered, but not with the expected shape.
  #[error("{0} wrong result format")]
  Format(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
