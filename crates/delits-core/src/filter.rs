//! Dimension filters.
//!
//! The dashboard historically used the string `"Tout"` as an "all" marker
//! mixed into each value domain. Here the marker only exists at the wire
//! boundary ([`DimensionFilter::from_wire`]); inside the engine a filter is a
//! tagged value and `"Tout"` is never compared against a column.

use std::collections::BTreeSet;

use crate::{FactRecord, department::DepartmentCode};

/// Wire token meaning "do not filter on this dimension".
pub const WILDCARD: &str = "Tout";

// ─── DimensionFilter ─────────────────────────────────────────────────────────

/// A restriction on a single dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DimensionFilter<T> {
  /// No restriction.
  #[default]
  All,
  /// Exact equality.
  Equals(T),
  /// Set membership. An empty set restricts nothing.
  OneOf(BTreeSet<T>),
}

impl<T: Ord> DimensionFilter<T> {
  /// Membership filter; collapses to [`DimensionFilter::All`] when `values`
  /// is empty.
  pub fn one_of(values: impl IntoIterator<Item = T>) -> Self {
    let set: BTreeSet<T> = values.into_iter().collect();
    if set.is_empty() { Self::All } else { Self::OneOf(set) }
  }

  /// Whether this filter lets every value through.
  pub fn is_all(&self) -> bool {
    match self {
      Self::All => true,
      Self::Equals(_) => false,
      Self::OneOf(set) => set.is_empty(),
    }
  }

  pub fn matches(&self, value: &T) -> bool {
    match self {
      Self::All => true,
      Self::Equals(expected) => expected == value,
      Self::OneOf(set) => set.is_empty() || set.contains(value),
    }
  }
}

impl<T> DimensionFilter<T>
where
  T: Ord + for<'a> From<&'a str>,
{
  /// Decode a single wire value. Absent, blank and `"Tout"` mean
  /// [`DimensionFilter::All`]; anything else is an exact match, even if no
  /// row carries that value.
  pub fn from_wire(value: Option<&str>) -> Self {
    match value.map(str::trim) {
      None | Some("") | Some(WILDCARD) => Self::All,
      Some(v) => Self::Equals(T::from(v)),
    }
  }

  /// Decode a comma-separated wire list. `"Tout"` entries are dropped; a
  /// list left empty means [`DimensionFilter::All`].
  pub fn from_wire_list(value: Option<&str>) -> Self {
    let Some(raw) = value else { return Self::All };
    Self::one_of(
      raw
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != WILDCARD)
        .map(T::from),
    )
  }
}

// ─── FactFilter ──────────────────────────────────────────────────────────────

/// Filters on the four dimensions, combined with logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FactFilter {
  pub department: DimensionFilter<DepartmentCode>,
  pub year:       DimensionFilter<String>,
  pub month:      DimensionFilter<String>,
  pub offense:    DimensionFilter<String>,
}

impl FactFilter {
  /// True when no dimension is restricted; queries then skip row matching.
  pub fn is_unrestricted(&self) -> bool {
    self.department.is_all()
      && self.year.is_all()
      && self.month.is_all()
      && self.offense.is_all()
  }

  pub fn matches(&self, record: &FactRecord) -> bool {
    self.department.matches(&record.department_code)
      && self.year.matches(&record.year)
      && self.month.matches(&record.month)
      && self.offense.matches(&record.offense_label)
  }
}
