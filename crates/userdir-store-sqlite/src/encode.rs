//! Row types and the mapping between SQLite columns and domain types.

use userdir_core::user::User;

use crate::{Error, Result};

/// Column list shared by every `users` select, in [`RawUser::from_row`] order.
pub const USER_COLUMNS: &str = "id, name, surname, age, gender, nationalize";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:          i64,
  pub name:        String,
  pub surname:     String,
  pub age:         i64,
  pub gender:      String,
  pub nationalize: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawUser {
      id:          row.get(0)?,
      name:        row.get(1)?,
      surname:     row.get(2)?,
      age:         row.get(3)?,
      gender:      row.get(4)?,
      nationalize: row.get(5)?,
    })
  }

  pub fn into_user(self, emails: Vec<String>) -> Result<User> {
    let age = u32::try_from(self.age).map_err(|_| {
      Error::InvalidRow(format!("user {} has age {}", self.id, self.age))
    })?;

    Ok(User {
      id: self.id,
      name: self.name,
      surname: self.surname,
      age,
      gender: self.gender,
      nationalize: self.nationalize,
      emails,
    })
  }
}
