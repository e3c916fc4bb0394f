//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/{id}/get_user` | 404 if not found |
//! | `PUT`  | `/users/{id}/edit_user` | Body: sparse patch; 400 on a malformed field |
//! | `POST` | `/users/add_user` | Body: [`NewUserBody`]; enriched, returns 201 |
//! | `GET`  | `/users/get_by_surname/{surname}` | First match by lowest id |
//! | `GET`  | `/users/get_all` | |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use userdir_core::{
  enrich::Enricher,
  patch::UserPatch,
  store::UserStore,
  user::{NewUser, User, UserId},
};

use crate::{
  AppState,
  error::{ApiError, ErrorBody},
};

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /users/{id}/get_user`
#[utoipa::path(
  get,
  path = "/api/users/{id}/get_user",
  tag = "users",
  params(("id" = i64, Path, description = "User id")),
  responses(
    (status = 200, description = "The user and its emails", body = User),
    (status = 404, description = "No such user", body = ErrorBody),
  )
)]
pub async fn get_user<S, E>(
  State(state): State<AppState<S, E>>,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError>
where
  S: UserStore,
  E: Enricher,
{
  tracing::info!(id, "get user");
  let user = state
    .store
    .get_user_by_id(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

/// `GET /users/get_by_surname/{surname}`
#[utoipa::path(
  get,
  path = "/api/users/get_by_surname/{surname}",
  tag = "users",
  params(("surname" = String, Path, description = "Exact surname")),
  responses(
    (status = 200, description = "Lowest-id user with this surname", body = User),
    (status = 404, description = "Nobody has this surname", body = ErrorBody),
  )
)]
pub async fn get_by_surname<S, E>(
  State(state): State<AppState<S, E>>,
  Path(surname): Path<String>,
) -> Result<Json<User>, ApiError>
where
  S: UserStore,
  E: Enricher,
{
  tracing::info!(%surname, "get user by surname");
  let user = state
    .store
    .get_user_by_surname(&surname)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no user with surname {surname:?}"))
    })?;
  Ok(Json(user))
}

/// `GET /users/get_all`
#[utoipa::path(
  get,
  path = "/api/users/get_all",
  tag = "users",
  responses((status = 200, description = "Every user", body = [User]))
)]
pub async fn get_all<S, E>(
  State(state): State<AppState<S, E>>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: UserStore,
  E: Enricher,
{
  let users = state.store.get_all().await.map_err(ApiError::store)?;
  tracing::info!(count = users.len(), "get all users");
  Ok(Json(users))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users/add_user`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewUserBody {
  pub name:    String,
  pub surname: String,
  #[serde(default)]
  pub emails:  Vec<String>,
}

/// `POST /users/add_user` — enrich the name, then persist.
///
/// Age, gender and nationality are looked up concurrently. If any lookup
/// fails the whole request fails and nothing is stored.
#[utoipa::path(
  post,
  path = "/api/users/add_user",
  tag = "users",
  request_body = NewUserBody,
  responses(
    (status = 201, description = "Enriched and stored", body = User),
    (status = 400, description = "Empty name or surname", body = ErrorBody),
    (status = 502, description = "A demographic lookup failed", body = ErrorBody),
  )
)]
pub async fn add_user<S, E>(
  State(state): State<AppState<S, E>>,
  Json(body): Json<NewUserBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: UserStore,
  E: Enricher,
{
  if body.name.trim().is_empty() || body.surname.trim().is_empty() {
    return Err(ApiError::BadRequest(
      "name and surname must not be empty".to_string(),
    ));
  }
  tracing::info!(name = %body.name, surname = %body.surname, "add user");

  let enricher = &state.enricher;
  let (age, gender, nationalize) = tokio::try_join!(
    enricher.get_age(&body.name, &body.surname),
    enricher.get_gender(&body.name, &body.surname),
    enricher.get_nationalize(&body.name, &body.surname),
  )
  .map_err(|e| ApiError::Enrichment(Box::new(e)))?;

  let user = state
    .store
    .add_user(NewUser {
      name: body.name,
      surname: body.surname,
      age,
      gender,
      nationalize,
      emails: body.emails,
    })
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// Documented shape of the `PUT /users/{id}/edit_user` body. Every key is
/// optional; the handler decodes the raw JSON into a
/// [`UserPatch`](userdir_core::patch::UserPatch).
#[derive(Debug, Deserialize, ToSchema)]
pub struct EditUserBody {
  pub name:        Option<String>,
  pub surname:     Option<String>,
  pub gender:      Option<String>,
  pub age:         Option<u32>,
  pub nationalize: Option<String>,
  /// Replaces the whole email set when present.
  #[serde(rename = "Emails")]
  pub emails:      Option<Vec<String>>,
}

/// `PUT /users/{id}/edit_user` — body is a sparse patch, e.g.
/// `{"age": 21, "Emails": ["a@x.com"]}`.
///
/// The body is decoded as plain JSON first so that absent keys and keys set
/// to empty values stay distinguishable.
#[utoipa::path(
  put,
  path = "/api/users/{id}/edit_user",
  tag = "users",
  params(("id" = i64, Path, description = "User id")),
  request_body = EditUserBody,
  responses(
    (status = 200, description = "The user after the patch", body = User),
    (status = 400, description = "Malformed field value", body = ErrorBody),
    (status = 404, description = "No such user", body = ErrorBody),
  )
)]
pub async fn edit_user<S, E>(
  State(state): State<AppState<S, E>>,
  Path(id): Path<UserId>,
  Json(body): Json<Value>,
) -> Result<Json<User>, ApiError>
where
  S: UserStore,
  E: Enricher,
{
  tracing::info!(id, patch = %body, "edit user");
  let patch = UserPatch::try_from(body)?;
  let user = state
    .store
    .edit_user(id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(user))
}
