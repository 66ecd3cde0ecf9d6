//! The envelope every query endpoint answers with.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
  Ok,
  /// The filters matched no rows.
  Empty,
}

/// `{"status": "ok" | "empty", "rows": [...]}`
///
/// An explicit `empty` status lets a client tell "nothing matched" apart from
/// "no query issued yet".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse<T> {
  pub status: QueryStatus,
  pub rows:   Vec<T>,
}

impl<T> From<Vec<T>> for QueryResponse<T> {
  fn from(rows: Vec<T>) -> Self {
    let status = if rows.is_empty() {
      QueryStatus::Empty
    } else {
      QueryStatus::Ok
    };
    Self { status, rows }
  }
}
