//! Extraction of guesses from the services' JSON bodies.

use serde_json::Value;

use crate::{Error, Result};

/// `{"age": 42, ...}`
pub fn parse_age(body: &Value) -> Result<u32> {
  let age = body.get("age").ok_or(Error::Format("age"))?;
  if let Some(u) = age.as_u64() {
    return u32::try_from(u).map_err(|_| Error::Format("age"));
  }
  match age.as_f64() {
    Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => {
      Ok(f as u32)
    }
    _ => Err(Error::Format("age")),
  }
}

/// `{"gender": "male", ...}`
pub fn parse_gender(body: &Value) -> Result<String> {
  body
    .get("gender")
    .and_then(Value::as_str)
    .map(str::to_owned)
    .ok_or(Error::Format("gender"))
}

/// `{"country": [{"country_id": "RU", ...}, ...]}` — the first entry is the
/// most likely one.
pub fn parse_nationalize(body: &Value) -> Result<String> {
  body
    .get("country")
    .and_then(Value::as_array)
    .and_then(|countries| countries.first())
    .and_then(|first| first.get("country_id"))
    .and_then(Value::as_str)
    .map(str::to_owned)
    .ok_or(Error::Format("nationalize"))
}
