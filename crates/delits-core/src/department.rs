//! Department codes and the metropolitan boundary.
//!
//! Codes are kept as strings: `"01"` must not lose its leading zero and the
//! Corsican departments are `"2A"` and `"2B"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Sheet names of the national aggregates. They are not departments.
pub const NATIONAL_AGGREGATE_SHEETS: [&str; 2] =
  ["France_Entière", "France_Métro"];

/// The last code kept by the metropolitan boundary (inclusive).
pub const LAST_METROPOLITAN_CODE: &str = "95";

// ─── DepartmentCode ──────────────────────────────────────────────────────────

/// An administrative department code such as `"75"` or `"2A"`.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub struct DepartmentCode(String);

impl DepartmentCode {
  /// Build a code from sheet or cell text. Surrounding whitespace is dropped;
  /// an empty code is rejected.
  pub fn parse(raw: &str) -> Result<Self> {
    let code = raw.trim();
    if code.is_empty() {
      return Err(Error::InvalidDepartmentCode(raw.to_owned()));
    }
    Ok(Self(code.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// Whether the code falls on the metropolitan side of the boundary.
  ///
  /// This is a plain lexicographic comparison against `"95"`: `"96"` and the
  /// three-character overseas codes (`"971"` …) sort after it. `"2A"` and
  /// `"2B"` sort before it and are therefore kept, as is any code starting
  /// with `'0'`–`'8'` regardless of length.
  pub fn is_metropolitan(&self) -> bool {
    self.0.as_str() <= LAST_METROPOLITAN_CODE
  }
}

impl From<&str> for DepartmentCode {
  fn from(value: &str) -> Self { Self(value.trim().to_owned()) }
}

impl From<String> for DepartmentCode {
  fn from(value: String) -> Self {
    if value.trim().len() == value.len() {
      Self(value)
    } else {
      Self(value.trim().to_owned())
    }
  }
}

impl From<DepartmentCode> for String {
  fn from(code: DepartmentCode) -> Self { code.0 }
}

impl AsRef<str> for DepartmentCode {
  fn as_ref(&self) -> &str { &self.0 }
}

impl fmt::Display for DepartmentCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Sheet classification ────────────────────────────────────────────────────

/// What a sheet of the incident workbook holds, judged from its name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetKind {
  /// `France_Entière` or `France_Métro`.
  NationalAggregate,
  /// A department past the metropolitan boundary.
  Overseas(DepartmentCode),
  Metropolitan(DepartmentCode),
}

impl SheetKind {
  /// Classify a sheet by name. Fails only on a blank name.
  pub fn classify(sheet_name: &str) -> Result<Self> {
    if NATIONAL_AGGREGATE_SHEETS.contains(&sheet_name.trim()) {
      return Ok(Self::NationalAggregate);
    }
    let code = DepartmentCode::parse(sheet_name)?;
    if code.is_metropolitan() {
      Ok(Self::Metropolitan(code))
    } else {
      Ok(Self::Overseas(code))
    }
  }
}
