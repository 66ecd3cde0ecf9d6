//! The aggregation engine.
//!
//! Four pure functions of (table, query): category ranking, regional totals,
//! regional-by-month totals and yearly totals. None of them fail: a filter
//! that matches nothing yields an empty result.
//!
//! Grouping keys are iterated in ascending order, so every result has a
//! deterministic row order before any caller-requested sort.

use std::collections::{BTreeMap, btree_map::Entry};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Error, FactRecord, FactTable, Result,
  department::DepartmentCode,
  filter::{DimensionFilter, FactFilter},
  record::cmp_numeric_aware,
};

// ─── Row selection ───────────────────────────────────────────────────────────

/// Rows of `table` accepted by `filter`. An unrestricted filter skips the
/// per-row match entirely; the rows produced are the same either way.
fn select<'a>(
  table: &'a FactTable,
  filter: &'a FactFilter,
) -> impl Iterator<Item = &'a FactRecord> + 'a {
  let unrestricted = filter.is_unrestricted();
  table.iter().filter(move |r| unrestricted || filter.matches(r))
}

// ─── Category ranking ────────────────────────────────────────────────────────

/// Sort direction for [`category_ranking`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
pub enum SortDirection {
  #[serde(rename = "asc", alias = "ascending")]
  #[strum(to_string = "asc", serialize = "ascending")]
  Ascending,
  #[default]
  #[serde(rename = "desc", alias = "descending")]
  #[strum(to_string = "desc", serialize = "descending")]
  Descending,
}

/// Parameters for [`category_ranking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingQuery {
  pub year:       DimensionFilter<String>,
  pub month:      DimensionFilter<String>,
  pub department: DimensionFilter<DepartmentCode>,
  pub direction:  SortDirection,
  pub limit:      usize,
}

impl Default for RankingQuery {
  fn default() -> Self {
    Self {
      year:       DimensionFilter::All,
      month:      DimensionFilter::All,
      department: DimensionFilter::All,
      direction:  SortDirection::Descending,
      limit:      10,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
  pub offense_label: String,
  pub total:         u64,
}

/// Sum `count` per offense label, sort by the sum in `query.direction` and
/// keep the first `query.limit` rows.
///
/// The sort is stable: labels with equal totals keep their ascending label
/// order.
pub fn category_ranking(
  table: &FactTable,
  query: &RankingQuery,
) -> Vec<CategoryTotal> {
  let filter = FactFilter {
    department: query.department.clone(),
    year:       query.year.clone(),
    month:      query.month.clone(),
    offense:    DimensionFilter::All,
  };

  let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
  for r in select(table, &filter) {
    let total = groups.entry(r.offense_label.as_str()).or_default();
    *total = total.saturating_add(r.count);
  }

  let mut rows: Vec<CategoryTotal> = groups
    .into_iter()
    .map(|(label, total)| CategoryTotal {
      offense_label: label.to_owned(),
      total,
    })
    .collect();

  match query.direction {
    SortDirection::Ascending => rows.sort_by(|a, b| a.total.cmp(&b.total)),
    SortDirection::Descending => rows.sort_by(|a, b| b.total.cmp(&a.total)),
  }
  rows.truncate(query.limit);
  rows
}

// ─── Regional totals ─────────────────────────────────────────────────────────

/// How [`regional_totals`] reports each department.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Scale {
  /// Plain summed counts.
  #[default]
  RawCount,
  /// `total / population * factor`, e.g. a factor of 1000 gives a rate per
  /// 1,000 inhabitants.
  PerInhabitants(f64),
}

impl Scale {
  /// Wire value selecting [`Scale::RawCount`].
  pub const RAW_COUNT_SENTINEL: f64 = -1.0;

  /// Decode the dashboard's `display` value: `-1` for raw counts, any other
  /// finite value is the factor. Zero and negative factors are taken as
  /// given.
  pub fn from_wire(value: f64) -> Result<Self> {
    if value == Self::RAW_COUNT_SENTINEL {
      Ok(Self::RawCount)
    } else if value.is_finite() {
      Ok(Self::PerInhabitants(value))
    } else {
      Err(Error::InvalidScale(value))
    }
  }
}

/// A department's figure in a regional result.
///
/// Serialises as a bare JSON number, or `null` for an undefined rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RegionalValue {
  Count(u64),
  Rate(f64),
  /// Rate requested for a department whose population is zero.
  UndefinedRate,
}

impl RegionalValue {
  pub fn as_f64(&self) -> Option<f64> {
    match *self {
      Self::Count(n) => Some(n as f64),
      Self::Rate(r) => Some(r),
      Self::UndefinedRate => None,
    }
  }
}

/// Parameters for [`regional_totals`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionalQuery {
  pub year:    DimensionFilter<String>,
  pub month:   DimensionFilter<String>,
  pub offense: DimensionFilter<String>,
  pub scale:   Scale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalTotal {
  pub department_code: DepartmentCode,
  pub department_name: String,
  pub population:      u64,
  pub value:           RegionalValue,
}

/// Sum `count` per department, ordered by department code.
///
/// Name and population are taken from the first record of each department;
/// the table invariants make every record agree.
pub fn regional_totals(
  table: &FactTable,
  query: &RegionalQuery,
) -> Vec<RegionalTotal> {
  let filter = FactFilter {
    department: DimensionFilter::All,
    year:       query.year.clone(),
    month:      query.month.clone(),
    offense:    query.offense.clone(),
  };

  let mut groups: BTreeMap<&DepartmentCode, (&FactRecord, u64)> =
    BTreeMap::new();
  for r in select(table, &filter) {
    match groups.entry(&r.department_code) {
      Entry::Vacant(slot) => {
        slot.insert((r, r.count));
      }
      Entry::Occupied(mut slot) => {
        let total = &mut slot.get_mut().1;
        *total = total.saturating_add(r.count);
      }
    }
  }

  groups
    .into_values()
    .map(|(first, total)| RegionalTotal {
      department_code: first.department_code.clone(),
      department_name: first.department_name.clone(),
      population:      first.population,
      value:           scale_total(total, first.population, query.scale),
    })
    .collect()
}

fn scale_total(total: u64, population: u64, scale: Scale) -> RegionalValue {
  match scale {
    Scale::RawCount => RegionalValue::Count(total),
    Scale::PerInhabitants(_) if population == 0 => RegionalValue::UndefinedRate,
    Scale::PerInhabitants(factor) => {
      RegionalValue::Rate(total as f64 / population as f64 * factor)
    }
  }
}

// ─── Regional-by-month totals ────────────────────────────────────────────────

/// Parameters for [`monthly_by_region`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthlyQuery {
  pub year:        DimensionFilter<String>,
  pub offense:     DimensionFilter<String>,
  /// Usually a [`DimensionFilter::OneOf`] of the departments to compare.
  pub departments: DimensionFilter<DepartmentCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRegionalTotal {
  pub department_code: DepartmentCode,
  pub month:           String,
  pub total:           u64,
}

/// Sum `count` per (department, month), ordered by department code then
/// month.
pub fn monthly_by_region(
  table: &FactTable,
  query: &MonthlyQuery,
) -> Vec<MonthlyRegionalTotal> {
  let filter = FactFilter {
    department: query.departments.clone(),
    year:       query.year.clone(),
    month:      DimensionFilter::All,
    offense:    query.offense.clone(),
  };

  let mut groups: BTreeMap<(&DepartmentCode, &str), u64> = BTreeMap::new();
  for r in select(table, &filter) {
    let total = groups
      .entry((&r.department_code, r.month.as_str()))
      .or_default();
    *total = total.saturating_add(r.count);
  }

  let mut rows: Vec<MonthlyRegionalTotal> = groups
    .into_iter()
    .map(|((code, month), total)| MonthlyRegionalTotal {
      department_code: code.clone(),
      month: month.to_owned(),
      total,
    })
    .collect();
  rows.sort_by(|a, b| {
    a.department_code
      .cmp(&b.department_code)
      .then_with(|| cmp_numeric_aware(&a.month, &b.month))
  });
  rows
}

// ─── Yearly totals ───────────────────────────────────────────────────────────

/// Parameters for [`yearly_totals`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrendQuery {
  pub offense:    DimensionFilter<String>,
  pub department: DimensionFilter<DepartmentCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyTotal {
  pub year:  String,
  pub total: u64,
}

/// Sum `count` per year, ordered by year ascending (numeric-aware).
pub fn yearly_totals(table: &FactTable, query: &TrendQuery) -> Vec<YearlyTotal> {
  let filter = FactFilter {
    department: query.department.clone(),
    year:       DimensionFilter::All,
    month:      DimensionFilter::All,
    offense:    query.offense.clone(),
  };

  let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
  for r in select(table, &filter) {
    let total = groups.entry(r.year.as_str()).or_default();
    *total = total.saturating_add(r.count);
  }

  let mut rows: Vec<YearlyTotal> = groups
    .into_iter()
    .map(|(year, total)| YearlyTotal { year: year.to_owned(), total })
    .collect();
  rows.sort_by(|a, b| cmp_numeric_aware(&a.year, &b.year));
  rows
}

// ─── Tests ───────────────────────────────────────────────────────────────────
