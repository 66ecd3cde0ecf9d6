//! Row mapping between [`FactRecord`] and the cache file.
//!
//! Codes, months and years stay text so leading zeros survive.

use delits_core::{FactRecord, department::DepartmentCode};
use serde::{Deserialize, Serialize};

/// One line of the cache file. Field order is column order.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheRow {
  #[serde(rename = "num_departement")]
  pub department_code: String,
  #[serde(rename = "mois")]
  pub month:           String,
  #[serde(rename = "annee")]
  pub year:            String,
  #[serde(rename = "fait")]
  pub offense_label:   String,
  #[serde(rename = "nombre")]
  pub count:           u64,
  pub population:      u64,
  #[serde(rename = "nom_departement")]
  pub department_name: String,
}

impl From<&FactRecord> for CacheRow {
  fn from(r: &FactRecord) -> Self {
    Self {
      department_code: r.department_code.to_string(),
      month:           r.month.clone(),
      year:            r.year.clone(),
      offense_label:   r.offense_label.clone(),
      count:           r.count,
      population:      r.population,
      department_name: r.department_name.clone(),
    }
  }
}

impl CacheRow {
  /// Rebuild the record. Fails only on a blank department code.
  pub fn into_record(self) -> delits_core::Result<FactRecord> {
    Ok(FactRecord {
      department_code: DepartmentCode::parse(&self.department_code)?,
      department_name: self.department_name,
      year:            self.year,
      month:           self.month,
      offense_label:   self.offense_label,
      count:           self.count,
      population:      self.population,
    })
  }
}
