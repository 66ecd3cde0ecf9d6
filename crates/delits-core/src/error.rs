//! Error types for `delits-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid department code: {0:?}")]
  InvalidDepartmentCode(String),

  /// Two records of the same department disagree on name or population.
  #[error(
    "department {code} has conflicting reference data: {first} vs {second}"
  )]
  InconsistentDepartment {
    code:   String,
    first:  String,
    second: String,
  },

  #[error(
    "duplicate observation for department {code}, {year}-{month}, offense \
     {offense:?}"
  )]
  DuplicateObservation {
    code:    String,
    year:    String,
    month:   String,
    offense: String,
  },

  #[error("invalid scale {0}: expected -1 (raw count) or a finite factor")]
  InvalidScale(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
