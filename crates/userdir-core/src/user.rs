//! The `User` aggregate and its scalar field set.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// System-assigned user identifier.
pub type UserId = i64;

/// A stored user together with its email set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
  /// System-assigned, never reused.
  #[schema(value_type = i64)]
  pub id:          UserId,
  pub name:        String,
  pub surname:     String,
  pub age:         u32,
  pub gender:      String,
  /// Country code, e.g. `"RU"`.
  pub nationalize: String,
  /// Owned exclusively by this user, kept in insertion order.
  #[serde(default)]
  pub emails:      Vec<String>,
}

/// A fully-enriched user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
  pub name:        String,
  pub surname:     String,
  pub age:         u32,
  pub gender:      String,
  pub nationalize: String,
  #[serde(default)]
  pub emails:      Vec<String>,
}

impl NewUser {
  /// Attach the id assigned by the store.
  pub fn with_id(self, id: UserId) -> User {
    User {
      id,
      name:        self.name,
      surname:     self.surname,
      age:         self.age,
      gender:      self.gender,
      nationalize: self.nationalize,
      emails:      self.emails,
    }
  }
}

// ─── Scalar fields ───────────────────────────────────────────────────────────

/// The closed set of scalar columns a patch may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
  Name,
  Surname,
  Gender,
  Age,
  Nationalize,
}

impl UserField {
  /// Fixed order in which patch assignments are applied.
  pub const ALL: [UserField; 5] = [
    UserField::Name,
    UserField::Surname,
    UserField::Gender,
    UserField::Age,
    UserField::Nationalize,
  ];

  /// Key used for this field in a JSON patch body.
  pub fn key(self) -> &'static str {
    match self {
      UserField::Name => "name",
      UserField::Surname => "surname",
      UserField::Gender => "gender",
      UserField::Age => "age",
      UserField::Nationalize => "nationalize",
    }
  }

  /// Column backing this field in the `users` relation. This is the only
  /// place SQL column names for patches come from.
  pub fn column(self) -> &'static str {
    match self {
      UserField::Name => "name",
      UserField::Surname => "surname",
      UserField::Gender => "gender",
      UserField::Age => "age",
      UserField::Nationalize => "nationalize",
    }
  }
}
