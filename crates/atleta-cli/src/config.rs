//! Application configuration.
//!
//! Layered: built-in defaults, then the optional TOML file, then
//! `ATLETA_*` environment variables (nested keys joined with `__`, e.g.
//! `ATLETA_STORE__PATH`). Resolved once at start and passed down.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use atleta_ingest::IngestConfig;
use atleta_store_sqlite::StoreConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub store:   StoreConfig,
  /// Directory receiving `atleta.log`.
  pub log_dir: PathBuf,
  pub ingest:  IngestConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store:   StoreConfig::default(),
      log_dir: PathBuf::from("."),
      ingest:  IngestConfig::default(),
    }
  }
}

impl AppConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = ::config::Config::builder()
      .add_source(::config::File::from(path.to_path_buf()).required(false))
      .add_source(
        ::config::Environment::with_prefix("ATLETA")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")
  }
}
