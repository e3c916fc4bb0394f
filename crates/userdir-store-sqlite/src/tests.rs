//! Integration tests for `SqliteStore` against an in-memory database.

use serde_json::json;
use userdir_core::{
  patch::UserPatch,
  store::UserStore,
  user::NewUser,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn test_user(surname: &str, emails: &[&str]) -> NewUser {
  NewUser {
    name:        "Test".into(),
    surname:     surname.into(),
    age:         20,
    gender:      "Male".into(),
    nationalize: "Russian".into(),
    emails:      emails.iter().map(|e| e.to_string()).collect(),
  }
}

fn patch(value: serde_json::Value) -> UserPatch {
  UserPatch::from_json(&value).expect("valid patch")
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
  v.sort();
  v
}

// ─── Create & read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user_by_id() {
  let s = store().await;
  let input = test_user("Testovich", &["a@test.com", "b@test.com"]);

  let added = s.add_user(input.clone()).await.unwrap();
  assert_eq!(added, input.clone().with_id(added.id));

  let fetched = s.get_user_by_id(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, added.id);
  assert_eq!(
    sorted(fetched.emails.clone()),
    sorted(input.emails.clone())
  );
  assert_eq!(fetched, input.with_id(added.id));
}

#[tokio::test]
async fn ids_are_unique() {
  let s = store().await;
  let a = s.add_user(test_user("A", &[])).await.unwrap();
  let b = s.add_user(test_user("B", &[])).await.unwrap();
  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn get_user_by_id_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user_by_id(404).await.unwrap().is_none());
}

#[tokio::test]
async fn user_without_emails_reads_back_empty() {
  let s = store().await;
  let added = s.add_user(test_user("Solo", &[])).await.unwrap();
  let fetched = s.get_user_by_id(added.id).await.unwrap().unwrap();
  assert!(fetched.emails.is_empty());
}

#[tokio::test]
async fn get_user_by_surname() {
  let s = store().await;
  s.add_user(test_user("Ivanov", &["i@x.com"])).await.unwrap();
  let petrov = s.add_user(test_user("Petrov", &["p@x.com"])).await.unwrap();

  let fetched = s.get_user_by_surname("Petrov").await.unwrap().unwrap();
  assert_eq!(fetched, petrov);

  assert!(s.get_user_by_surname("petrov").await.unwrap().is_none());
  assert!(s.get_user_by_surname("Sidorov").await.unwrap().is_none());
}

#[tokio::test]
async fn get_user_by_surname_duplicates_pick_lowest_id() {
  let s = store().await;
  let first = s.add_user(test_user("Smith", &["1@x.com"])).await.unwrap();
  s.add_user(test_user("Smith", &["2@x.com"])).await.unwrap();

  let fetched = s.get_user_by_surname("Smith").await.unwrap().unwrap();
  assert_eq!(fetched.id, first.id);
  assert_eq!(fetched.emails, vec!["1@x.com".to_string()]);
}

#[tokio::test]
async fn get_all_empty() {
  let s = store().await;
  assert!(s.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_all_attaches_each_users_emails() {
  let s = store().await;
  let a = s.add_user(test_user("A", &["a1@x.com", "a2@x.com"])).await.unwrap();
  let b = s.add_user(test_user("B", &[])).await.unwrap();
  let c = s.add_user(test_user("C", &["c@x.com"])).await.unwrap();

  let mut all = s.get_all().await.unwrap();
  all.sort_by_key(|u| u.id);
  assert_eq!(all, vec![a, b, c]);
}

// ─── Partial update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn edit_age_only_leaves_everything_else() {
  let s = store().await;
  let added = s
    .add_user(test_user("Testovich", &["t@test.com"]))
    .await
    .unwrap();

  let edited = s.edit_user(added.id, patch(json!({ "age": 21 }))).await.unwrap();

  let mut expected = added.clone();
  expected.age = 21;
  assert_eq!(edited, expected);
  assert_eq!(s.get_user_by_id(added.id).await.unwrap().unwrap(), expected);
}

#[tokio::test]
async fn edit_accepts_integral_float_age() {
  let s = store().await;
  let added = s.add_user(test_user("Float", &["f@x.com"])).await.unwrap();

  let edited =
    s.edit_user(added.id, patch(json!({ "age": 31.0 }))).await.unwrap();
  assert_eq!(edited.age, 31);
  assert_eq!(edited.name, added.name);
  assert_eq!(edited.surname, added.surname);
  assert_eq!(edited.gender, added.gender);
  assert_eq!(edited.nationalize, added.nationalize);
  assert_eq!(edited.emails, added.emails);
}

#[tokio::test]
async fn edit_empty_patch_returns_current_row() {
  let s = store().await;
  let added = s.add_user(test_user("Same", &["s@x.com"])).await.unwrap();

  let edited = s.edit_user(added.id, UserPatch::default()).await.unwrap();
  assert_eq!(edited, added);
  assert_eq!(s.get_user_by_id(added.id).await.unwrap().unwrap(), added);
}

#[tokio::test]
async fn edit_emails_only_replaces_set_and_skips_update() {
  let s = store().await;
  let added = s
    .add_user(test_user("Mail", &["old@x.com", "a@x.com"]))
    .await
    .unwrap();

  let edited = s
    .edit_user(added.id, patch(json!({ "Emails": ["a@x.com", "b@x.com"] })))
    .await
    .unwrap();

  assert_eq!(
    sorted(edited.emails.clone()),
    vec!["a@x.com".to_string(), "b@x.com".to_string()]
  );
  assert!(!edited.emails.contains(&"old@x.com".to_string()));
  assert_eq!(edited.age, added.age);

  let fetched = s.get_user_by_id(added.id).await.unwrap().unwrap();
  assert_eq!(fetched, edited);
}

#[tokio::test]
async fn edit_with_empty_email_list_clears_emails() {
  let s = store().await;
  let added = s.add_user(test_user("Clear", &["c@x.com"])).await.unwrap();

  let edited =
    s.edit_user(added.id, patch(json!({ "Emails": [] }))).await.unwrap();
  assert!(edited.emails.is_empty());
}

#[tokio::test]
async fn edit_all_scalar_fields_and_emails() {
  let s = store().await;
  let added = s.add_user(test_user("Old", &["o@x.com"])).await.unwrap();

  let edited = s
    .edit_user(
      added.id,
      patch(json!({
        "name": "New",
        "surname": "Newer",
        "gender": "female",
        "age": 44,
        "nationalize": "FI",
        "Emails": ["n@x.com"],
      })),
    )
    .await
    .unwrap();

  assert_eq!(edited.id, added.id);
  assert_eq!(edited.name, "New");
  assert_eq!(edited.surname, "Newer");
  assert_eq!(edited.gender, "female");
  assert_eq!(edited.age, 44);
  assert_eq!(edited.nationalize, "FI");
  assert_eq!(edited.emails, vec!["n@x.com".to_string()]);

  let by_surname = s.get_user_by_surname("Newer").await.unwrap().unwrap();
  assert_eq!(by_surname, edited);
}

#[tokio::test]
async fn edit_does_not_touch_other_users() {
  let s = store().await;
  let a = s.add_user(test_user("A", &["a@x.com"])).await.unwrap();
  let b = s.add_user(test_user("B", &["b@x.com"])).await.unwrap();

  s.edit_user(a.id, patch(json!({ "age": 99, "Emails": [] })))
    .await
    .unwrap();

  assert_eq!(s.get_user_by_id(b.id).await.unwrap().unwrap(), b);
}

#[tokio::test]
async fn edit_missing_user_fails_and_writes_nothing() {
  let s = store().await;

  let err = s
    .edit_user(77, patch(json!({ "age": 1, "Emails": ["ghost@x.com"] })))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(userdir_core::Error::UserNotFound(77))
  ));

  // The email insert was rolled back with the rest of the transaction: a user
  // later assigned id 77 must not inherit it. Probe the table directly.
  let orphans: i64 = s
    .conn_for_tests()
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM emails WHERE user_id = 77",
        [],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(orphans, 0);
}

#[tokio::test]
async fn failed_update_rolls_back_email_replacement() {
  let s = store().await;
  let added = s.add_user(test_user("Atomic", &["keep@x.com"])).await.unwrap();

  // Force the UPDATE to fail after the email replacement has run.
  s.conn_for_tests()
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER reject_age BEFORE UPDATE OF age ON users
         BEGIN SELECT RAISE(ABORT, 'age rejected'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s
    .edit_user(
      added.id,
      patch(json!({ "age": 30, "Emails": ["replaced@x.com"] })),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));

  let fetched = s.get_user_by_id(added.id).await.unwrap().unwrap();
  assert_eq!(fetched, added);
}

#[tokio::test]
async fn undecodable_row_aborts_edit_without_committing() {
  let s = store().await;
  let added = s.add_user(test_user("Broken", &["b@x.com"])).await.unwrap();
  let id = added.id;

  // A negative age cannot be mapped back onto `User`.
  s.conn_for_tests()
    .call(move |conn| {
      conn.execute("UPDATE users SET age = -5 WHERE id = ?1", [id])?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s
    .edit_user(id, patch(json!({ "name": "Changed", "Emails": [] })))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::InvalidRow(_)));

  let (name, email_count): (String, i64) = s
    .conn_for_tests()
    .call(move |conn| {
      let name = conn.query_row(
        "SELECT name FROM users WHERE id = ?1",
        [id],
        |row| row.get(0),
      )?;
      let count = conn.query_row(
        "SELECT COUNT(*) FROM emails WHERE user_id = ?1",
        [id],
        |row| row.get(0),
      )?;
      Ok((name, count))
    })
    .await
    .unwrap();
  assert_eq!(name, "Test");
  assert_eq!(email_count, 1);
}

// ─── Opening ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_fails_on_unusable_path() {
  let dir = tempfile::tempdir().unwrap();
  assert!(SqliteStore::open(dir.path()).await.is_err());
}

#[tokio::test]
async fn ids_stay_unique_across_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("users.db");

  let first = {
    let s = SqliteStore::open(&path).await.unwrap();
    let user = s.add_user(test_user("First", &["f@x.com"])).await.unwrap();
    // Deleting the highest row must not let its id be handed out again.
    s.conn_for_tests()
      .call(|conn| {
        conn.execute_batch("DELETE FROM users; DELETE FROM emails;")?;
        Ok(())
      })
      .await
      .unwrap();
    user
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let second = s.add_user(test_user("Second", &[])).await.unwrap();
  assert_ne!(first.id, second.id);
  assert!(s.get_user_by_id(first.id).await.unwrap().is_none());

  let fetched = s.get_user_by_id(second.id).await.unwrap().unwrap();
  assert_eq!(fetched, second);
}
