//! Core types and trait definitions for the user directory.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod enrich;
pub mod error;
pub mod patch;
pub mod store;
pub mod user;

pub use error::{Error, Result};
