//! The `UserStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `userdir-store-sqlite`).
//! Higher layers (`userdir-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  patch::UserPatch,
  user::{NewUser, User, UserId},
};

/// Abstraction over a user directory backend.
///
/// Every operation runs on its own connection resource; multi-step writes
/// run inside a single transaction so that no partial effect is observable.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a user and its emails by id. Returns `None` if not found.
  fn get_user_by_id(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve one user with exactly this surname. Returns `None` if nobody
  /// matches. Surnames are not unique; see the backend for its tie-break.
  fn get_user_by_surname<'a>(
    &'a self,
    surname: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// List every user with its emails. Empty when the store is empty.
  fn get_all(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Persist an already-enriched user and return it with its assigned id.
  fn add_user(
    &self,
    user: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Apply a sparse patch atomically and return the post-update row.
  ///
  /// Only fields present in `patch` are written. When `patch.emails` is
  /// present the whole email set is replaced. Fails with a not-found error
  /// if `id` does not exist, in which case nothing is written.
  fn edit_user(
    &self,
    id: UserId,
    patch: UserPatch,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;
}
