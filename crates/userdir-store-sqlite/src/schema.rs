//! SQL schema for the user directory SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT: ids are never reused, even after the highest row is gone.
CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT    NOT NULL,
    surname      TEXT    NOT NULL,
    age          INTEGER NOT NULL,
    gender       TEXT    NOT NULL,
    nationalize  TEXT    NOT NULL
);

-- Owned by users(id), but deliberately without a declared constraint.
CREATE TABLE IF NOT EXISTS emails (
    user_id  INTEGER NOT NULL,
    email    TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS emails_user_idx    ON emails(user_id);
CREATE INDEX IF NOT EXISTS users_surname_idx  ON users(surname);

PRAGMA user_version = 1;
";

/// Liveness probe run right after the connection is opened.
pub const PROBE: &str = "SELECT 1";
