//! Runtime server configuration.
//!
//! Read from an optional TOML file, then overridden by `USERDIR_*`
//! environment variables (`USERDIR_PORT=9000`,
//! `USERDIR_ENRICH__AGIFY_URL=http://…`).

use std::path::{Path, PathBuf};

use config::{ConfigError, Environment, File, Source};
use serde::Deserialize;
use userdir_enrich::EnrichConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; created on first start.
  pub store_path: PathBuf,
  pub enrich:     EnrichConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("users.db"),
      enrich:     EnrichConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Load from `path` (which may be missing) layered with the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_source(File::from(path).required(false))
  }

  fn from_source<S>(file: S) -> Result<Self, ConfigError>
  where
    S: Source + Send + Sync + 'static,
  {
    config::Config::builder()
      .add_source(file)
      .add_source(
        Environment::with_prefix("USERDIR")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  #[test]
  fn missing_keys_fall_back_to_defaults() {
    let cfg =
      ServerConfig::from_source(File::from_str("", FileFormat::Toml)).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("users.db"));
    assert_eq!(cfg.enrich.agify_url, "https://api.agify.io");
  }

  #[test]
  fn file_values_override_defaults() {
    let toml = r#"
      host = "0.0.0.0"
      port = 9000
      store_path = "/var/lib/userdir/users.db"

      [enrich]
      genderize_url = "http://localhost:7000/genderize"
      timeout_secs = 3
    "#;
    let cfg =
      ServerConfig::from_source(File::from_str(toml, FileFormat::Toml)).unwrap();

    assert_eq!(cfg.address(), "0.0.0.0:9000");
    assert_eq!(cfg.enrich.genderize_url, "http://localhost:7000/genderize");
    assert_eq!(cfg.enrich.timeout_secs, 3);
    assert_eq!(cfg.enrich.nationalize_url, "https://api.nationalize.io");
  }
}
