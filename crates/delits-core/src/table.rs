//! [`FactTable`]: the immutable, shareable normalized table.

use std::{
  collections::{HashMap, HashSet},
  sync::Arc,
};

use crate::{Error, FactRecord, Result, department::DepartmentCode};

/// The normalized fact table.
///
/// Built once (by the normalizer or from the cache) and never mutated
/// afterwards. The records are reference-counted, so a clone is cheap and the
/// same snapshot can be handed to any number of concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct FactTable {
  records: Arc<[FactRecord]>,
}

impl FactTable {
  /// Take ownership of `records` after checking the table invariants:
  ///
  /// - a department code determines its name and population;
  /// - each (department, year, month, offense) appears at most once.
  pub fn new(records: Vec<FactRecord>) -> Result<Self> {
    check_invariants(&records)?;
    Ok(Self { records: records.into() })
  }

  pub fn records(&self) -> &[FactRecord] { &self.records }

  pub fn iter(&self) -> std::slice::Iter<'_, FactRecord> {
    self.records.iter()
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  /// Number of distinct departments in the table.
  pub fn department_count(&self) -> usize {
    self
      .records
      .iter()
      .map(|r| &r.department_code)
      .collect::<HashSet<_>>()
      .len()
  }
}

impl<'a> IntoIterator for &'a FactTable {
  type Item = &'a FactRecord;
  type IntoIter = std::slice::Iter<'a, FactRecord>;

  fn into_iter(self) -> Self::IntoIter { self.iter() }
}

fn check_invariants(records: &[FactRecord]) -> Result<()> {
  let mut departments: HashMap<&DepartmentCode, (&str, u64)> = HashMap::new();
  let mut observations: HashSet<(&DepartmentCode, &str, &str, &str)> =
    HashSet::with_capacity(records.len());

  for r in records {
    let reference = (r.department_name.as_str(), r.population);
    let first = *departments.entry(&r.department_code).or_insert(reference);
    if first != reference {
      return Err(Error::InconsistentDepartment {
        code:   r.department_code.to_string(),
        first:  format!("{} ({})", first.0, first.1),
        second: format!("{} ({})", reference.0, reference.1),
      });
    }

    let key = (
      &r.department_code,
      r.year.as_str(),
      r.month.as_str(),
      r.offense_label.as_str(),
    );
    if !observations.insert(key) {
      return Err(Error::DuplicateObservation {
        code:    r.department_code.to_string(),
        year:    r.year.clone(),
        month:   r.month.clone(),
        offense: r.offense_label.clone(),
      });
    }
  }
  Ok(())
}
