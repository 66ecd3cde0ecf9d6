//! Error types for the delits-xlsx normalizer.
//!
//! Every variant is fatal for a build. Messages start with the failure kind
//! (`parse error`, `reference join error`) so they read well at exit.

use thiserror::Error;

use crate::header::HeaderError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("parse error: workbook could not be decoded: {0}")]
  Workbook(#[from] calamine::XlsxError),

  #[error("parse error: sheet {0:?} not found")]
  MissingSheet(String),

  #[error("parse error: sheet {sheet:?} has no {column:?} column")]
  MissingColumn { sheet: String, column: String },

  #[error(
    "parse error: column {header:?} in sheet {sheet:?} is not \
     <prefix>_<year>_<month>: {reason}"
  )]
  ColumnHeader {
    sheet:  String,
    header: String,
    #[source]
    reason: HeaderError,
  },

  #[error("parse error: sheet {sheet:?} row {row} has counts but no offense label")]
  MissingLabel { sheet: String, row: usize },

  #[error(
    "parse error: sheet {sheet:?}, offense {offense:?}, column {header:?}: \
     {value} is not a non-negative integer count"
  )]
  InvalidCount {
    sheet:   String,
    offense: String,
    header:  String,
    value:   String,
  },

  #[error("parse error: population row {row}: {reason}")]
  InvalidPopulationRow { row: usize, reason: String },

  #[error("parse error: department {0} appears twice in the population table")]
  DuplicateDepartment(String),

  #[error(
    "reference join error: department {0} is absent from the population table"
  )]
  UnknownDepartment(String),

  #[error("invalid table: {0}")]
  Core(#[from] delits_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
