//! The population reference table, keyed by department code.

use std::collections::{HashMap, hash_map::Entry};

use delits_core::department::DepartmentCode;

use crate::{Cell, Error, Result, Workbook};

/// Where the population figures live in the reference workbook.
///
/// Indices are zero-based and absolute (column `C` is 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationLayout {
  pub sheet:             String,
  /// First row holding data; rows above it are titles and headers.
  pub first_data_row:    usize,
  pub code_column:       usize,
  pub name_column:       usize,
  pub population_column: usize,
}

impl Default for PopulationLayout {
  /// The INSEE "ensemble" workbook: sheet `Départements`, seven title rows
  /// and one header row, then code in C, name in D, total population in I.
  fn default() -> Self {
    Self {
      sheet:             "Départements".to_owned(),
      first_data_row:    8,
      code_column:       2,
      name_column:       3,
      population_column: 8,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentInfo {
  pub name:       String,
  pub population: u64,
}

/// Department name and population, looked up by code.
#[derive(Debug, Clone, Default)]
pub struct PopulationTable {
  entries: HashMap<DepartmentCode, DepartmentInfo>,
}

impl PopulationTable {
  /// Read the table from `workbook` according to `layout`.
  ///
  /// Rows with a blank code are skipped (footnotes, spacing). A code listed
  /// twice is an error.
  pub fn from_workbook(
    workbook: &Workbook,
    layout: &PopulationLayout,
  ) -> Result<Self> {
    let sheet = workbook
      .sheet(&layout.sheet)
      .ok_or_else(|| Error::MissingSheet(layout.sheet.clone()))?;

    let mut table = Self::default();
    for row in layout.first_data_row..sheet.rows.len() {
      let Some(code) = department_code(sheet.cell(row, layout.code_column))
      else {
        continue;
      };

      let name = sheet
        .cell(row, layout.name_column)
        .as_text()
        .ok_or_else(|| Error::InvalidPopulationRow {
          row,
          reason: format!("department {code} has no name"),
        })?
        .into_owned();

      let cell = sheet.cell(row, layout.population_column);
      let population = cell.as_count().ok_or_else(|| {
        Error::InvalidPopulationRow {
          row,
          reason: format!("department {code}: {cell:?} is not a population"),
        }
      })?;

      table.insert(code, DepartmentInfo { name, population })?;
    }
    Ok(table)
  }

  /// Add one department. Fails if the code is already present.
  pub fn insert(&mut self, code: DepartmentCode, info: DepartmentInfo) -> Result<()> {
    match self.entries.entry(code) {
      Entry::Occupied(slot) => Err(Error::DuplicateDepartment(slot.key().to_string())),
      Entry::Vacant(slot) => {
        slot.insert(info);
        Ok(())
      }
    }
  }

  pub fn lookup(&self, code: &DepartmentCode) -> Option<&DepartmentInfo> {
    self.entries.get(code)
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

/// Codes stored as numbers lose their leading zero; restore it so `1` joins
/// with sheet `"01"`.
fn department_code(cell: &Cell) -> Option<DepartmentCode> {
  match cell {
    Cell::Int(n) => Some(DepartmentCode::from(format!("{n:02}"))),
    Cell::Float(f) if f.fract() == 0.0 && *f >= 0.0 => {
      Some(DepartmentCode::from(format!("{:02}", *f as i64)))
    }
    other => other
      .as_text()
      .and_then(|t| DepartmentCode::parse(&t).ok()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Sheet;

  /// An INSEE-shaped sheet: eight leading rows, then data from row 8.
  fn insee_sheet(data: Vec<Vec<Cell>>) -> Workbook {
    let mut rows = vec![vec![Cell::from("Titre")]; 7];
    rows.push(vec![
      Cell::from("Code région"),
      Cell::from("Nom de la région"),
      Cell::from("Code département"),
      Cell::from("Nom du département"),
    ]);
    rows.extend(data);
    Workbook::new(vec![
      Sheet::new("Régions", vec![]),
      Sheet::new("Départements", rows),
    ])
  }

  fn row(code: Cell, name: &str, population: Cell) -> Vec<Cell> {
    let mut cells = vec![
      Cell::from("11"),
      Cell::from("Île-de-France"),
      code,
      Cell::from(name),
    ];
    cells.extend(std::iter::repeat_n(Cell::Int(0), 4));
    cells.push(population);
    cells
  }

  #[test]
  fn reads_code_name_and_population() {
    let wb = insee_sheet(vec![
      row(Cell::from("75"), "Paris", Cell::Int(2_133_111)),
      row(Cell::from("2A"), "Corse-du-Sud", Cell::Float(158_507.0)),
      row(Cell::Int(1), "Ain", Cell::from("652 432")),
    ]);
    let table =
      PopulationTable::from_workbook(&wb, &PopulationLayout::default()).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.lookup(&"75".into()), Some(&DepartmentInfo {
      name:       "Paris".into(),
      population: 2_133_111,
    }));
    assert_eq!(table.lookup(&"2A".into()).unwrap().population, 158_507);
    assert_eq!(table.lookup(&"01".into()).unwrap().name, "Ain");
  }

  #[test]
  fn blank_code_rows_are_skipped() {
    let wb = insee_sheet(vec![
      row(Cell::from("75"), "Paris", Cell::Int(1)),
      vec![],
      vec![Cell::from("Source : Insee")],
    ]);
    let table =
      PopulationTable::from_workbook(&wb, &PopulationLayout::default()).unwrap();
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn missing_sheet() {
    let err = PopulationTable::from_workbook(
      &Workbook::default(),
      &PopulationLayout::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingSheet(s) if s == "Départements"));
  }

  #[test]
  fn unreadable_population_is_an_error() {
    let wb = insee_sheet(vec![row(Cell::from("75"), "Paris", Cell::from("n/a"))]);
    let err =
      PopulationTable::from_workbook(&wb, &PopulationLayout::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidPopulationRow { row: 8, .. }));
  }

  #[test]
  fn duplicate_code_is_an_error() {
    let wb = insee_sheet(vec![
      row(Cell::from("75"), "Paris", Cell::Int(1)),
      row(Cell::from("75"), "Paris", Cell::Int(2)),
    ]);
    let err =
      PopulationTable::from_workbook(&wb, &PopulationLayout::default()).unwrap_err();
    assert!(matches!(err, Error::DuplicateDepartment(c) if c == "75"));
  }
}
