//! Wide-to-long transform of the incident workbook.

use delits_core::{
  FactRecord, FactTable,
  department::{DepartmentCode, SheetKind},
};
use tracing::debug;

use crate::{
  Error, PopulationTable, Result, Sheet, Workbook, header::PeriodColumn,
};

/// Header of the column holding the offense category.
pub const LABEL_COLUMN: &str = "libellé index";

/// Leading metadata columns on every department sheet; period columns start
/// after them.
pub const INDEX_COLUMNS: usize = 2;

/// What happened to one sheet, reported to the observer of
/// [`normalize_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetProgress<'a> {
  pub sheet:   &'a str,
  pub outcome: SheetOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetOutcome {
  NationalAggregate,
  Overseas,
  Normalized { records: usize },
}

/// Normalize `incidents` against `population`, logging each sheet at debug
/// level.
pub fn normalize(
  incidents: &Workbook,
  population: &PopulationTable,
) -> Result<FactTable> {
  normalize_with(incidents, population, |p| {
    debug!(sheet = p.sheet, outcome = ?p.outcome, "sheet processed");
  })
}

/// Normalize `incidents` against `population`, calling `observe` once per
/// sheet in workbook order.
///
/// National aggregate sheets and departments past the metropolitan boundary
/// are skipped. Every other sheet must join with the population table and
/// have well-formed period headers and counts; the first failure aborts.
pub fn normalize_with<F>(
  incidents: &Workbook,
  population: &PopulationTable,
  mut observe: F,
) -> Result<FactTable>
where
  F: FnMut(&SheetProgress<'_>),
{
  let mut records = Vec::new();

  for sheet in incidents.sheets() {
    let outcome = match SheetKind::classify(&sheet.name)? {
      SheetKind::NationalAggregate => SheetOutcome::NationalAggregate,
      SheetKind::Overseas(_) => SheetOutcome::Overseas,
      SheetKind::Metropolitan(code) => {
        let before = records.len();
        normalize_sheet(sheet, code, population, &mut records)?;
        SheetOutcome::Normalized {
          records: records.len() - before,
        }
      }
    };
    observe(&SheetProgress {
      sheet: &sheet.name,
      outcome,
    });
  }

  Ok(FactTable::new(records)?)
}

// ─── Per-sheet transform ─────────────────────────────────────────────────────

/// A period column: its absolute index, raw header and parsed period.
struct Column {
  index:  usize,
  header: String,
  period: PeriodColumn,
}

fn normalize_sheet(
  sheet: &Sheet,
  code: DepartmentCode,
  population: &PopulationTable,
  out: &mut Vec<FactRecord>,
) -> Result<()> {
  let info = population
    .lookup(&code)
    .ok_or_else(|| Error::UnknownDepartment(code.to_string()))?;

  let label_column = label_column(sheet)?;
  let columns = period_columns(sheet, label_column)?;

  for row in 1..sheet.rows.len() {
    let Some(label) = sheet.cell(row, label_column).as_text() else {
      if columns.iter().all(|c| sheet.cell(row, c.index).is_empty()) {
        continue;
      }
      return Err(Error::MissingLabel {
        sheet: sheet.name.clone(),
        row,
      });
    };

    for column in &columns {
      let value = sheet.cell(row, column.index);
      let count = value.as_count().ok_or_else(|| Error::InvalidCount {
        sheet:   sheet.name.clone(),
        offense: label.to_string(),
        header:  column.header.clone(),
        value:   format!("{value:?}"),
      })?;

      out.push(FactRecord {
        department_code: code.clone(),
        department_name: info.name.clone(),
        year: column.period.year.clone(),
        month: column.period.month.clone(),
        offense_label: label.to_string(),
        count,
        population: info.population,
      });
    }
  }
  Ok(())
}

fn label_column(sheet: &Sheet) -> Result<usize> {
  sheet
    .header()
    .iter()
    .position(|c| c.as_text().is_some_and(|t| t == LABEL_COLUMN))
    .ok_or_else(|| Error::MissingColumn {
      sheet:  sheet.name.clone(),
      column: LABEL_COLUMN.to_owned(),
    })
}

/// Parse every header past the index columns. A blank header is tolerated
/// only when nothing is stored below it (trailing formatting).
fn period_columns(sheet: &Sheet, label_column: usize) -> Result<Vec<Column>> {
  let mut columns = Vec::new();
  for (index, cell) in sheet.header().iter().enumerate().skip(INDEX_COLUMNS) {
    if index == label_column {
      continue;
    }
    let header = cell.as_text().unwrap_or_default();
    if header.is_empty() {
      let unused =
        (1..sheet.rows.len()).all(|row| sheet.cell(row, index).is_empty());
      if unused {
        continue;
      }
    }

    let period =
      PeriodColumn::parse(&header).map_err(|reason| Error::ColumnHeader {
        sheet: sheet.name.clone(),
        header: header.to_string(),
        reason,
      })?;
    columns.push(Column {
      index,
      header: header.into_owned(),
      period,
    });
  }
  Ok(columns)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Cell, DepartmentInfo, header::HeaderError};

  // ── fixtures ──

  fn population() -> PopulationTable {
    let mut table = PopulationTable::default();
    for (code, name, population) in [
      ("2A", "Corse-du-Sud", 158_507),
      ("75", "Paris", 2_000_000),
      ("93", "Seine-Saint-Denis", 1_600_000),
    ] {
      table
        .insert(code.into(), DepartmentInfo {
          name: name.into(),
          population,
        })
        .unwrap();
    }
    table
  }

  fn header(periods: &[&str]) -> Vec<Cell> {
    let mut row = vec![Cell::from("Index"), Cell::from(LABEL_COLUMN)];
    row.extend(periods.iter().map(|p| Cell::from(*p)));
    row
  }

  fn data(index: i64, label: &str, counts: &[i64]) -> Vec<Cell> {
    let mut row = vec![Cell::Int(index), Cell::from(label)];
    row.extend(counts.iter().map(|n| Cell::Int(*n)));
    row
  }

  fn department(name: &str) -> Sheet {
    Sheet::new(name, vec![
      header(&["_2020_01", "_2020_02"]),
      data(1, "Vols", &[10, 20]),
      data(2, "Homicides", &[0, 1]),
    ])
  }

  // ── tests ──

  #[test]
  fn wide_rows_become_one_record_per_cell() {
    let wb = Workbook::new(vec![department("75")]);
    let table = normalize(&wb, &population()).unwrap();

    assert_eq!(table.len(), 4);
    let first = &table.records()[0];
    assert_eq!(first, &FactRecord {
      department_code: "75".into(),
      department_name: "Paris".into(),
      year: "2020".into(),
      month: "01".into(),
      offense_label: "Vols".into(),
      count: 10,
      population: 2_000_000,
    });
    let total: u64 = table.iter().map(|r| r.count).sum();
    assert_eq!(total, 31);
  }

  #[test]
  fn excluded_sheets_never_reach_the_table() {
    let wb = Workbook::new(vec![
      Sheet::new("France_Entière", vec![]),
      Sheet::new("France_Métro", vec![]),
      department("2A"),
      department("75"),
      department("96"),
      department("971"),
    ]);
    let mut seen = Vec::new();
    let table = normalize_with(&wb, &population(), |p| {
      seen.push((p.sheet.to_owned(), p.outcome.clone()));
    })
    .unwrap();

    let codes: std::collections::BTreeSet<_> =
      table.iter().map(|r| r.department_code.as_str()).collect();
    // "2A" < "95" as a string, so Corse-du-Sud is kept.
    assert_eq!(codes.into_iter().collect::<Vec<_>>(), ["2A", "75"]);

    assert_eq!(seen, [
      ("France_Entière".to_owned(), SheetOutcome::NationalAggregate),
      ("France_Métro".to_owned(), SheetOutcome::NationalAggregate),
      ("2A".to_owned(), SheetOutcome::Normalized { records: 4 }),
      ("75".to_owned(), SheetOutcome::Normalized { records: 4 }),
      ("96".to_owned(), SheetOutcome::Overseas),
      ("971".to_owned(), SheetOutcome::Overseas),
    ]);
  }

  #[test]
  fn reference_data_is_consistent_per_department() {
    let wb = Workbook::new(vec![department("75"), department("93")]);
    let table = normalize(&wb, &population()).unwrap();
    for r in &table {
      let info = population().lookup(&r.department_code).cloned().unwrap();
      assert_eq!(r.department_name, info.name);
      assert_eq!(r.population, info.population);
    }
  }

  #[test]
  fn unknown_department_is_a_join_error() {
    let wb = Workbook::new(vec![department("13")]);
    let err = normalize(&wb, &population()).unwrap_err();
    assert!(matches!(&err, Error::UnknownDepartment(c) if c == "13"));
    assert!(err.to_string().starts_with("reference join error"));
  }

  #[test]
  fn malformed_period_header_is_a_parse_error() {
    let wb = Workbook::new(vec![Sheet::new("75", vec![
      header(&["_2020_01", "2020-02"]),
      data(1, "Vols", &[1, 2]),
    ])]);
    let err = normalize(&wb, &population()).unwrap_err();
    match err {
      Error::ColumnHeader { header, reason, .. } => {
        assert_eq!(header, "2020-02");
        assert_eq!(reason, HeaderError::TokenCount(1));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn missing_label_column_is_a_parse_error() {
    let wb = Workbook::new(vec![Sheet::new("75", vec![vec![
      Cell::from("Index"),
      Cell::from("libelle"),
      Cell::from("_2020_01"),
    ]])]);
    let err = normalize(&wb, &population()).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { .. }));
  }

  #[test]
  fn non_integer_count_is_a_parse_error() {
    let wb = Workbook::new(vec![Sheet::new("75", vec![
      header(&["_2020_01"]),
      vec![Cell::Int(1), Cell::from("Vols"), Cell::from("beaucoup")],
    ])]);
    let err = normalize(&wb, &population()).unwrap_err();
    assert!(matches!(err, Error::InvalidCount { offense, .. } if offense == "Vols"));
  }

  #[test]
  fn blank_rows_and_unused_blank_columns_are_ignored() {
    let mut head = header(&["_2020_01"]);
    head.push(Cell::Empty);
    let wb = Workbook::new(vec![Sheet::new("75", vec![
      head,
      data(1, "Vols", &[3]),
      vec![],
      vec![Cell::Empty, Cell::from("  ")],
    ])]);
    let table = normalize(&wb, &population()).unwrap();
    assert_eq!(table.len(), 1);
  }

  #[test]
  fn counts_without_label_are_rejected() {
    let wb = Workbook::new(vec![Sheet::new("75", vec![
      header(&["_2020_01"]),
      vec![Cell::Int(1), Cell::Empty, Cell::Int(4)],
    ])]);
    let err = normalize(&wb, &population()).unwrap_err();
    assert!(matches!(err, Error::MissingLabel { row: 1, .. }));
  }

  #[test]
  fn repeated_label_is_a_duplicate_observation() {
    let wb = Workbook::new(vec![Sheet::new("75", vec![
      header(&["_2020_01"]),
      data(1, "Vols", &[1]),
      data(2, "Vols", &[2]),
    ])]);
    let err = normalize(&wb, &population()).unwrap_err();
    assert!(matches!(
      err,
      Error::Core(delits_core::Error::DuplicateObservation { .. })
    ));
  }
}
