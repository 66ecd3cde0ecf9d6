//! The `SourceReader` trait: where the raw workbooks come from.
//!
//! Implemented by the server's HTTP reader and by test fixtures. The build
//! pipeline depends on this abstraction, not on any transport.

use std::future::Future;

use bytes::Bytes;

/// Retrieves the two source workbooks as in-memory buffers.
///
/// Implementations must treat a non-success response as an error; a partial
/// or degraded buffer is never returned.
pub trait SourceReader: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The incident workbook: one sheet per department, one column per month.
  fn incident_workbook(
    &self,
  ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send + '_;

  /// The population reference workbook.
  fn population_workbook(
    &self,
  ) -> impl Future<Output = Result<Bytes, Self::Error>> + Send + '_;
}
