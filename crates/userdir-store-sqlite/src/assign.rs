//! Parameterised `UPDATE users SET …` construction.
//!
//! Column names only ever come from [`UserField::column`]; every value is a
//! bound parameter.

use rusqlite::types::Value;
use userdir_core::{
  patch::{ScalarValue, UserPatch},
  user::{UserField, UserId},
};

/// Accumulates `column = ?N` clauses with their bound values.
#[derive(Debug, Default)]
pub struct Assignments {
  clauses: Vec<String>,
  values:  Vec<Value>,
}

impl Assignments {
  /// Collect every scalar change present in `patch`, in fixed field order.
  pub fn from_patch(patch: &UserPatch) -> Self {
    let mut assignments = Self::default();
    for (field, value) in patch.scalar_changes() {
      assignments.push(field, value);
    }
    assignments
  }

  pub fn push(&mut self, field: UserField, value: ScalarValue<'_>) {
    let placeholder = self.values.len() + 1;
    self.clauses.push(format!("{} = ?{placeholder}", field.column()));
    self.values.push(match value {
      ScalarValue::Text(s) => Value::Text(s.to_owned()),
      ScalarValue::Integer(i) => Value::Integer(i),
    });
  }

  pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

  /// Build the statement for user `id`, with the id bound last.
  ///
  /// Returns `None` when there is nothing to assign; an empty `SET` is not
  /// valid SQL.
  pub fn into_statement(mut self, id: UserId) -> Option<(String, Vec<Value>)> {
    if self.is_empty() {
      return None;
    }
    let sql = format!(
      "UPDATE users SET {} WHERE id = ?{}",
      self.clauses.join(", "),
      self.values.len() + 1,
    );
    self.values.push(Value::Integer(id));
    Some((sql, self.values))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_patch_builds_no_statement() {
    let assignments = Assignments::from_patch(&UserPatch::default());
    assert!(assignments.is_empty());
    assert!(assignments.into_statement(1).is_none());
  }

  #[test]
  fn emails_only_patch_builds_no_statement() {
    let patch = UserPatch {
      emails: Some(vec!["a@x.com".into()]),
      ..Default::default()
    };
    assert!(Assignments::from_patch(&patch).into_statement(1).is_none());
  }

  #[test]
  fn clauses_follow_field_order_and_id_is_last() {
    let patch = UserPatch {
      nationalize: Some("RU".into()),
      age:         Some(21),
      name:        Some("Ivan".into()),
      ..Default::default()
    };

    let (sql, values) =
      Assignments::from_patch(&patch).into_statement(42).unwrap();

    assert_eq!(
      sql,
      "UPDATE users SET name = ?1, age = ?2, nationalize = ?3 WHERE id = ?4"
    );
    assert_eq!(
      values,
      vec![
        Value::Text("Ivan".into()),
        Value::Integer(21),
        Value::Text("RU".into()),
        Value::Integer(42),
      ]
    );
  }
}
