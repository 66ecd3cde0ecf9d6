//! Error type for `delits-store-csv`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The file exists but does not hold a valid fact table. Remove it to
  /// trigger a rebuild.
  #[error("cache corrupt error: {}: {reason}", path.display())]
  Corrupt { path: PathBuf, reason: String },

  #[error("cache i/o error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("cache write error on {}: {source}", path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: csv::Error,
  },

  /// The build function handed to `load_or_build` failed.
  #[error(transparent)]
  Build(Box<dyn std::error::Error + Send + Sync>),

  #[error("cache task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
