//! Sparse user updates.
//!
//! A [`UserPatch`] names only the fields a caller wants to change. It is built
//! from a decoded JSON body by [`UserPatch::from_json`], which performs all
//! type checks up front so the store only ever sees well-typed values.

use serde_json::{Map, Value};

use crate::{
  Error, Result,
  user::UserField,
};

/// JSON key that triggers replacement of the whole email set.
pub const EMAILS_KEY: &str = "Emails";

/// A partial update for a single user.
///
/// `None` means "leave untouched". `emails: Some(vec![])` clears the email
/// set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
  pub name:        Option<String>,
  pub surname:     Option<String>,
  pub gender:      Option<String>,
  pub age:         Option<u32>,
  pub nationalize: Option<String>,
  pub emails:      Option<Vec<String>>,
}

/// A borrowed scalar value ready to be bound into a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarValue<'a> {
  Text(&'a str),
  Integer(i64),
}

impl UserPatch {
  /// Decode a patch from an arbitrary JSON value.
  ///
  /// Unknown keys are ignored. Known keys with a value of the wrong type
  /// produce [`Error::Format`].
  pub fn from_json(value: &Value) -> Result<Self> {
    let obj = value
      .as_object()
      .ok_or_else(|| Error::format("patch", "expected a JSON object"))?;

    Ok(UserPatch {
      name:        non_empty_text(obj, UserField::Name)?,
      surname:     non_empty_text(obj, UserField::Surname)?,
      gender:      text(obj, UserField::Gender)?,
      age:         age(obj)?,
      nationalize: text(obj, UserField::Nationalize)?,
      emails:      emails(obj)?,
    })
  }

  /// True when applying the patch would change nothing.
  pub fn is_empty(&self) -> bool {
    self.emails.is_none() && self.scalar_changes().next().is_none()
  }

  /// Present scalar fields, in [`UserField::ALL`] order.
  pub fn scalar_changes(&self) -> impl Iterator<Item = (UserField, ScalarValue<'_>)> {
    UserField::ALL.into_iter().filter_map(move |field| {
      let value = match field {
        UserField::Name => self.name.as_deref().map(ScalarValue::Text),
        UserField::Surname => self.surname.as_deref().map(ScalarValue::Text),
        UserField::Gender => self.gender.as_deref().map(ScalarValue::Text),
        UserField::Age => self.age.map(|a| ScalarValue::Integer(i64::from(a))),
        UserField::Nationalize => {
          self.nationalize.as_deref().map(ScalarValue::Text)
        }
      };
      value.map(|v| (field, v))
    })
  }
}

impl TryFrom<Value> for UserPatch {
  type Error = Error;

  fn try_from(value: Value) -> Result<Self> { UserPatch::from_json(&value) }
}

// ─── Field decoders ──────────────────────────────────────────────────────────

fn text(obj: &Map<String, Value>, field: UserField) -> Result<Option<String>> {
  match obj.get(field.key()) {
    None => Ok(None),
    Some(Value::String(s)) => Ok(Some(s.clone())),
    Some(other) => Err(Error::format(
      field.key(),
      format!("expected a string, got {}", kind(other)),
    )),
  }
}

fn non_empty_text(
  obj: &Map<String, Value>,
  field: UserField,
) -> Result<Option<String>> {
  let value = text(obj, field)?;
  if value.as_deref().is_some_and(|s| s.trim().is_empty()) {
    return Err(Error::format(field.key(), "must not be empty"));
  }
  Ok(value)
}

fn age(obj: &Map<String, Value>) -> Result<Option<u32>> {
  let key = UserField::Age.key();
  let Some(value) = obj.get(key) else {
    return Ok(None);
  };
  let Value::Number(n) = value else {
    return Err(Error::format(
      key,
      format!("expected a number, got {}", kind(value)),
    ));
  };

  if let Some(u) = n.as_u64() {
    return u32::try_from(u)
      .map(Some)
      .map_err(|_| Error::format(key, format!("{u} is out of range")));
  }
  if n.is_i64() {
    return Err(Error::format(key, "must not be negative"));
  }

  // Floats are accepted when they hold an integral value, e.g. `31.0`.
  let f = n.as_f64().unwrap_or(f64::NAN);
  if !f.is_finite() || f.fract() != 0.0 {
    return Err(Error::format(key, format!("{n} is not an integer")));
  }
  if f < 0.0 {
    return Err(Error::format(key, "must not be negative"));
  }
  if f > f64::from(u32::MAX) {
    return Err(Error::format(key, format!("{n} is out of range")));
  }
  Ok(Some(f as u32))
}

fn emails(obj: &Map<String, Value>) -> Result<Option<Vec<String>>> {
  let Some(value) = obj.get(EMAILS_KEY) else {
    return Ok(None);
  };
  let Value::Array(items) = value else {
    return Err(Error::format(
      EMAILS_KEY,
      format!("expected an array, got {}", kind(value)),
    ));
  };

  items
    .iter()
    .map(|item| match item {
      Value::String(s) => Ok(s.clone()),
      other => Err(Error::format(
        EMAILS_KEY,
        format!("expected an array of strings, found {}", kind(other)),
      )),
    })
    .collect::<Result<Vec<_>>>()
    .map(Some)
}

fn kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn field_of(err: Error) -> &'static str {
    match err {
      Error::Format { field, .. } => field,
      other => panic!("expected a format error, got {other:?}"),
    }
  }

  #[test]
  fn empty_object_is_empty_patch() {
    let patch = UserPatch::from_json(&json!({})).unwrap();
    assert!(patch.is_empty());
    assert_eq!(patch, UserPatch::default());
  }

  #[test]
  fn non_object_body_is_rejected() {
    let err = UserPatch::from_json(&json!(["name"])).unwrap_err();
    assert_eq!(field_of(err), "patch");
  }

  #[test]
  fn unknown_keys_are_ignored() {
    let patch =
      UserPatch::from_json(&json!({ "id": 99, "emails": ["x@y.z"] })).unwrap();
    assert!(patch.is_empty());
  }

  #[test]
  fn age_accepts_integral_numbers() {
    let patch = UserPatch::from_json(&json!({ "age": 21 })).unwrap();
    assert_eq!(patch.age, Some(21));

    let patch = UserPatch::from_json(&json!({ "age": 31.0 })).unwrap();
    assert_eq!(patch.age, Some(31));
  }

  #[test]
  fn age_rejects_bad_values() {
    for bad in [json!("not-a-number"), json!(21.5), json!(-1), json!(null)] {
      let err = UserPatch::from_json(&json!({ "age": bad })).unwrap_err();
      assert_eq!(field_of(err), "age");
    }
  }

  #[test]
  fn text_fields_require_strings() {
    let err = UserPatch::from_json(&json!({ "gender": 1 })).unwrap_err();
    assert_eq!(field_of(err), "gender");

    let err = UserPatch::from_json(&json!({ "name": "  " })).unwrap_err();
    assert_eq!(field_of(err), "name");
  }

  #[test]
  fn gender_may_be_empty() {
    let patch = UserPatch::from_json(&json!({ "gender": "" })).unwrap();
    assert_eq!(patch.gender.as_deref(), Some(""));
  }

  #[test]
  fn emails_must_be_array_of_strings() {
    let err =
      UserPatch::from_json(&json!({ "Emails": "a@x.com" })).unwrap_err();
    assert_eq!(field_of(err), EMAILS_KEY);

    let err =
      UserPatch::from_json(&json!({ "Emails": ["a@x.com", 3] })).unwrap_err();
    assert_eq!(field_of(err), EMAILS_KEY);

    let patch =
      UserPatch::from_json(&json!({ "Emails": ["a@x.com", "b@x.com"] }))
        .unwrap();
    assert_eq!(
      patch.emails,
      Some(vec!["a@x.com".to_string(), "b@x.com".to_string()])
    );
    assert!(!patch.is_empty());
    assert_eq!(patch.scalar_changes().count(), 0);
  }

  #[test]
  fn scalar_changes_follow_fixed_order() {
    let patch = UserPatch::from_json(&json!({
      "nationalize": "RU",
      "age": 40,
      "name": "Ivan",
    }))
    .unwrap();

    let fields: Vec<_> = patch.scalar_changes().map(|(f, _)| f).collect();
    assert_eq!(
      fields,
      vec![UserField::Name, UserField::Age, UserField::Nationalize]
    );

    let values: Vec<_> = patch.scalar_changes().map(|(_, v)| v).collect();
    assert_eq!(values[1], ScalarValue::Integer(40));
  }
}
