//! The fact record: one row of the normalized table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::department::DepartmentCode;

/// Recorded incidents of one offense category, in one department, for one
/// month.
///
/// `department_name` and `population` are denormalized from the population
/// reference and repeated on every record of the department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
  pub department_code: DepartmentCode,
  pub department_name: String,
  /// Four-digit calendar year, kept as text.
  pub year:            String,
  /// Two-digit calendar month, kept as text (`"01"` … `"12"`).
  pub month:           String,
  pub offense_label:   String,
  pub count:           u64,
  pub population:      u64,
}

/// Order digit strings by value and everything else lexicographically.
///
/// `"996"` sorts before `"2022"`. Equal values with different padding
/// (`"07"`, `"7"`) fall back to the lexicographic order so the result is total.
pub fn cmp_numeric_aware(a: &str, b: &str) -> Ordering {
  match (digits_value(a), digits_value(b)) {
    (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => a.cmp(b),
  }
}

fn digits_value(s: &str) -> Option<u128> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}
