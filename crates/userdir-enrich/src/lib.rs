//! HTTP enrichment client for the user directory.
//!
//! Guesses age, gender and nationality from a full name by querying
//! agify.io, genderize.io and nationalize.io (or compatible endpoints).

mod client;
mod parse;

pub mod error;

pub use client::{EnrichConfig, HttpEnricher};
pub use error::{Error, Result};
