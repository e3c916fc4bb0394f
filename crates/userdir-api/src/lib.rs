//! JSON REST API for the user directory.
//!
//! Exposes an axum [`Router`] backed by any [`UserStore`] and [`Enricher`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", userdir_api::api_router(state))
//! ```

pub mod error;
pub mod openapi;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use tower_http::trace::TraceLayer;
use userdir_core::{enrich::Enricher, store::UserStore};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, E> {
  pub store:    Arc<S>,
  pub enricher: Arc<E>,
}

impl<S, E> AppState<S, E> {
  pub fn new(store: S, enricher: E) -> Self {
    Self { store: Arc::new(store), enricher: Arc::new(enricher) }
  }
}

// Only the `Arc`s are cloned, so neither `S` nor `E` needs `Clone`.
impl<S, E> Clone for AppState<S, E> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), enricher: self.enricher.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the `/users` API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, E>(state: AppState<S, E>) -> Router<()>
where
  S: UserStore + 'static,
  E: Enricher + 'static,
{
  Router::new()
    .route("/users/{id}/get_user", get(users::get_user::<S, E>))
    .route("/users/{id}/edit_user", put(users::edit_user::<S, E>))
    .route("/users/add_user", post(users::add_user::<S, E>))
    .route(
      "/users/get_by_surname/{surname}",
      get(users::get_by_surname::<S, E>),
    )
    .route("/users/get_all", get(users::get_all::<S, E>))
    .with_state(state)
}

/// The full application: the API nested under `/api`, its OpenAPI document
/// at [`openapi::DOC_PATH`], and request tracing.
pub fn app<S, E>(state: AppState<S, E>) -> Router<()>
where
  S: UserStore + 'static,
  E: Enricher + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .route(openapi::DOC_PATH, get(openapi::doc))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
