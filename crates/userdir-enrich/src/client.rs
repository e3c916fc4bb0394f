//! [`HttpEnricher`] — a `reqwest` implementation of [`Enricher`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use userdir_core::enrich::Enricher;

use crate::{
  Error, Result,
  parse::{parse_age, parse_gender, parse_nationalize},
};

/// Endpoints and timeout for the three inference services.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
  pub agify_url:       String,
  pub genderize_url:   String,
  pub nationalize_url: String,
  /// Per-request timeout, in seconds.
  pub timeout_secs:    u64,
}

impl Default for EnrichConfig {
  fn default() -> Self {
    Self {
      agify_url:       "https://api.agify.io".to_string(),
      genderize_url:   "https://api.genderize.io".to_string(),
      nationalize_url: "https://api.nationalize.io".to_string(),
      timeout_secs:    10,
    }
  }
}

/// Async HTTP client for the demographic inference services.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpEnricher {
  client: Client,
  config: EnrichConfig,
}

impl HttpEnricher {
  pub fn new(config: EnrichConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self { client, config })
  }

  /// `GET <base>?name=<name surname>` and decode the JSON body.
  async fn fetch(&self, base: &str, name: &str, surname: &str) -> Result<Value> {
    let resp = self
      .client
      .get(base)
      .query(&[("name", format!("{name} {surname}"))])
      .send()
      .await?;

    if resp.status() != StatusCode::OK {
      return Err(Error::Status {
        url:    resp.url().to_string(),
        status: resp.status(),
      });
    }
    Ok(resp.json().await?)
  }
}

impl Enricher for HttpEnricher {
  type Error = Error;

  async fn get_age(&self, name: &str, surname: &str) -> Result<u32> {
    let body = self.fetch(&self.config.agify_url, name, surname).await?;
    let age = parse_age(&body)?;
    tracing::info!(age, "got age for {name} {surname}");
    Ok(age)
  }

  async fn get_gender(&self, name: &str, surname: &str) -> Result<String> {
    let body = self.fetch(&self.config.genderize_url, name, surname).await?;
    let gender = parse_gender(&body)?;
    tracing::info!(%gender, "got gender for {name} {surname}");
    Ok(gender)
  }

  async fn get_nationalize(&self, name: &str, surname: &str) -> Result<String> {
    let body = self.fetch(&self.config.nationalize_url, name, surname).await?;
    let nationalize = parse_nationalize(&body)?;
    tracing::info!(%nationalize, "got nationalize for {name} {surname}");
    Ok(nationalize)
  }
}
