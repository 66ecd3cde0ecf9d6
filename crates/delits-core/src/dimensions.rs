//! Distinct values per dimension, for populating filter choices.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{FactTable, department::DepartmentCode, record::cmp_numeric_aware};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
  pub code:       DepartmentCode,
  pub name:       String,
  pub population: u64,
}

/// The values a caller may pick for each dimension. The wildcard is not
/// listed; it is a filter, not a value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DimensionValues {
  /// Ordered by code.
  pub departments: Vec<DepartmentSummary>,
  /// Ascending, numeric-aware.
  pub years:       Vec<String>,
  /// Ascending, numeric-aware.
  pub months:      Vec<String>,
  /// Ascending.
  pub offenses:    Vec<String>,
}

pub fn dimension_values(table: &FactTable) -> DimensionValues {
  let mut departments = BTreeMap::new();
  let mut years = BTreeSet::new();
  let mut months = BTreeSet::new();
  let mut offenses = BTreeSet::new();

  for r in table {
    departments
      .entry(&r.department_code)
      .or_insert_with(|| DepartmentSummary {
        code:       r.department_code.clone(),
        name:       r.department_name.clone(),
        population: r.population,
      });
    years.insert(r.year.as_str());
    months.insert(r.month.as_str());
    offenses.insert(r.offense_label.as_str());
  }

  let mut years: Vec<String> = years.into_iter().map(str::to_owned).collect();
  years.sort_by(|a, b| cmp_numeric_aware(a, b));
  let mut months: Vec<String> = months.into_iter().map(str::to_owned).collect();
  months.sort_by(|a, b| cmp_numeric_aware(a, b));

  DimensionValues {
    departments: departments.into_values().collect(),
    years,
    months,
    offenses: offenses.into_iter().map(str::to_owned).collect(),
  }
}
