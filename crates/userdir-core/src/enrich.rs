//! The `Enricher` trait: demographic guesses derived from a name.
//!
//! Implemented by `userdir-enrich` over HTTP; test code supplies fixed
//! stand-ins.

use std::future::Future;

/// Source of best-guess demographics for a first/last name pair.
///
/// Each call is independent; a failure in one does not affect the others.
pub trait Enricher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn get_age<'a>(
    &'a self,
    name: &'a str,
    surname: &'a str,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + 'a;

  fn get_gender<'a>(
    &'a self,
    name: &'a str,
    surname: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Most likely nationality as a country code, e.g. `"RU"`.
  fn get_nationalize<'a>(
    &'a self,
    name: &'a str,
    surname: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
