//! OpenAPI description of the user API, served at [`DOC_PATH`].

use axum::Json;
use utoipa::OpenApi;
use userdir_core::user::User;

use crate::{
  error::ErrorBody,
  users::{self, EditUserBody, NewUserBody},
};

/// Where the generated document is served.
pub const DOC_PATH: &str = "/swagger/doc.json";

#[derive(OpenApi)]
#[openapi(
  info(title = "userdir", description = "User directory with demographic enrichment"),
  paths(
    users::get_user,
    users::edit_user,
    users::add_user,
    users::get_by_surname,
    users::get_all,
  ),
  components(schemas(User, NewUserBody, EditUserBody, ErrorBody)),
  tags((name = "users", description = "Read, create and patch users"))
)]
pub struct ApiDoc;

/// `GET /swagger/doc.json`
pub async fn doc() -> Json<utoipa::openapi::OpenApi> {
  Json(ApiDoc::openapi())
}
