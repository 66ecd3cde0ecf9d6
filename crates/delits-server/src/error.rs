//! Build pipeline errors.

use thiserror::Error;

/// Why the fact table could not be built from source. Every variant aborts
/// the build; no partial table is ever returned.
///
/// `E` is the error type of the [`SourceReader`] in use.
///
/// [`SourceReader`]: delits_core::source::SourceReader
#[derive(Debug, Error)]
pub enum BuildError<E> {
  /// A workbook could not be retrieved.
  #[error(transparent)]
  Source(E),

  /// The workbooks were retrieved but could not be normalized.
  #[error(transparent)]
  Normalize(#[from] delits_xlsx::Error),

  #[error("build task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}
