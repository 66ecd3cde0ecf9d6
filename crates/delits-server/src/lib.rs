//! Server side of the délits dashboard.
//!
//! Fetches the source workbooks over HTTP, builds (or loads from cache) the
//! fact table once, then serves the query API from it.

pub mod build;
pub mod error;
pub mod fetch;

pub use build::build_table;
pub use error::BuildError;
pub use fetch::{FetchError, HttpSource};

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Incident counts by department and month, published by the ministry.
pub const DEFAULT_INCIDENT_URL: &str =
  "https://www.data.gouv.fr/fr/datasets/r/fdf5afbf-ed3c-4c54-a4f0-3581c8a1eca4";

/// INSEE legal population by department.
pub const DEFAULT_POPULATION_URL: &str =
  "https://www.insee.fr/fr/statistiques/fichier/7739582/ensemble.xlsx";

/// Runtime configuration, deserialised from `delits.toml` and `DELITS_*`
/// environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub cache_path:         PathBuf,
  pub incident_url:       String,
  pub population_url:     String,
  pub fetch_timeout_secs: u64,
  /// Rebuild from source even when the cache file exists.
  pub force_rebuild:      bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "127.0.0.1".to_string(),
      port:               8050,
      cache_path:         PathBuf::from("data/output.csv"),
      incident_url:       DEFAULT_INCIDENT_URL.to_string(),
      population_url:     DEFAULT_POPULATION_URL.to_string(),
      fetch_timeout_secs: 60,
      force_rebuild:      false,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `DELITS_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("DELITS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
