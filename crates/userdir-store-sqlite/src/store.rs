//! [`SqliteStore`] — the SQLite implementation of [`UserStore`].

use std::{collections::HashMap, path::Path};

use rusqlite::OptionalExtension as _;

use userdir_core::{
  Error as CoreError,
  patch::UserPatch,
  store::UserStore,
  user::{NewUser, User, UserId},
};

use crate::{
  assign::Assignments,
  encode::{RawUser, USER_COLUMNS},
  schema::{PROBE, SCHEMA},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A user directory backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, probe it and run schema
  /// initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row(PROBE, [], |row| row.get::<_, i64>(0))?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("user store ready");
    Ok(())
  }

  /// Run a single-user lookup: the scalar row selected by `filter`, then its
  /// emails.
  async fn get_user_where(
    &self,
    filter: &'static str,
    param: rusqlite::types::Value,
  ) -> Result<Option<User>> {
    let found: Option<(RawUser, Vec<String>)> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {filter}");
        let raw = conn
          .query_row(&sql, rusqlite::params![param], RawUser::from_row)
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };
        let emails = select_emails(conn, raw.id)?;
        Ok(Some((raw, emails)))
      })
      .await?;

    found.map(|(raw, emails)| raw.into_user(emails)).transpose()
  }
}

// ─── Synchronous helpers ─────────────────────────────────────────────────────
//
// These run on the connection thread and take a plain `Connection`, so they
// work equally inside and outside a transaction.

fn select_user(
  conn: &rusqlite::Connection,
  id: UserId,
) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
      rusqlite::params![id],
      RawUser::from_row,
    )
    .optional()
}

fn select_emails(
  conn: &rusqlite::Connection,
  id: UserId,
) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare_cached(
    "SELECT email FROM emails WHERE user_id = ?1 ORDER BY rowid",
  )?;
  let emails = stmt
    .query_map(rusqlite::params![id], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(emails)
}

fn insert_emails(
  conn: &rusqlite::Connection,
  id: UserId,
  emails: &[String],
) -> rusqlite::Result<()> {
  let mut stmt =
    conn.prepare_cached("INSERT INTO emails (user_id, email) VALUES (?1, ?2)")?;
  for email in emails {
    stmt.execute(rusqlite::params![id, email])?;
  }
  Ok(())
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>> {
    self.get_user_where("id = ?1", id.into()).await
  }

  async fn get_user_by_surname(&self, surname: &str) -> Result<Option<User>> {
    // Surnames are not unique: the lowest id wins.
    self
      .get_user_where(
        "surname = ?1 ORDER BY id LIMIT 1",
        surname.to_owned().into(),
      )
      .await
  }

  async fn get_all(&self) -> Result<Vec<User>> {
    let (raws, email_rows): (Vec<RawUser>, Vec<(UserId, String)>) = self
      .conn
      .call(|conn| {
        let raws = conn
          .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let emails = conn
          .prepare("SELECT user_id, email FROM emails ORDER BY rowid")?
          .query_map([], |row| {
            Ok((row.get::<_, UserId>(0)?, row.get::<_, String>(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((raws, emails))
      })
      .await?;

    let mut by_user: HashMap<UserId, Vec<String>> = HashMap::new();
    for (user_id, email) in email_rows {
      by_user.entry(user_id).or_default().push(email);
    }

    raws
      .into_iter()
      .map(|raw| {
        let emails = by_user.remove(&raw.id).unwrap_or_default();
        raw.into_user(emails)
      })
      .collect()
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn add_user(&self, user: NewUser) -> Result<User> {
    let row = user.clone();

    let id: UserId = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO users (name, surname, age, gender, nationalize)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            row.name,
            row.surname,
            row.age,
            row.gender,
            row.nationalize,
          ],
        )?;
        let id = tx.last_insert_rowid();
        insert_emails(&tx, id, &row.emails)?;
        tx.commit()?;
        Ok(id)
      })
      .await?;

    tracing::debug!(id, "user added");
    Ok(user.with_id(id))
  }

  async fn edit_user(&self, id: UserId, patch: UserPatch) -> Result<User> {
    let update = Assignments::from_patch(&patch).into_statement(id);
    if let Some((sql, _)) = &update {
      tracing::debug!(id, %sql, "patching user");
    }
    let emails = patch.emails;

    let edited: Option<Result<User>> = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls everything back.
        let tx = conn.transaction()?;

        if let Some(emails) = &emails {
          tx.execute(
            "DELETE FROM emails WHERE user_id = ?1",
            rusqlite::params![id],
          )?;
          insert_emails(&tx, id, emails)?;
        }

        if let Some((sql, values)) = &update {
          tx.execute(sql, rusqlite::params_from_iter(values.iter()))?;
        }

        let Some(raw) = select_user(&tx, id)? else {
          return Ok(None);
        };
        let emails = select_emails(&tx, id)?;

        // Decode before committing: an undecodable row aborts the patch.
        let user = match raw.into_user(emails) {
          Ok(user) => user,
          Err(e) => return Ok(Some(Err(e))),
        };

        tx.commit()?;
        Ok(Some(Ok(user)))
      })
      .await?;

    let user = edited.ok_or(CoreError::UserNotFound(id))??;
    tracing::debug!(id, "patch committed");
    Ok(user)
  }
}

#[cfg(test)]
impl SqliteStore {
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection {
    &self.conn
  }
}
