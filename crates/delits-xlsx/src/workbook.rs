//! In-memory workbook model.
//!
//! The normalizer works on this model rather than on `calamine` types, so it
//! can be exercised with hand-built sheets. [`Workbook::from_xlsx`] is the only
//! place that touches the xlsx decoder.

use std::{borrow::Cow, io::Cursor};

use calamine::{Data, Range, Reader, Xlsx, open_workbook_from_rs};

use crate::Result;

// ─── Cell ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
  #[default]
  Empty,
  Int(i64),
  Float(f64),
  Text(String),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
  pub fn is_empty(&self) -> bool {
    match self {
      Self::Empty => true,
      Self::Text(s) => s.trim().is_empty(),
      Self::Int(_) | Self::Float(_) => false,
    }
  }

  /// The cell rendered as trimmed text; `None` when blank.
  ///
  /// Integral floats render without a fractional part, so a code typed as
  /// the number `75` reads back as `"75"`.
  pub fn as_text(&self) -> Option<Cow<'_, str>> {
    match self {
      Self::Empty => None,
      Self::Text(s) => {
        let t = s.trim();
        (!t.is_empty()).then_some(Cow::Borrowed(t))
      }
      Self::Int(n) => Some(Cow::Owned(n.to_string())),
      Self::Float(f) => Some(Cow::Owned(match integral(*f) {
        Some(n) => n.to_string(),
        None => f.to_string(),
      })),
    }
  }

  /// The cell as a non-negative integer.
  ///
  /// Text is accepted when it is made of digits, optionally grouped with
  /// spaces (regular, non-breaking or narrow non-breaking).
  pub fn as_count(&self) -> Option<u64> {
    match self {
      Self::Empty => None,
      Self::Int(n) => u64::try_from(*n).ok(),
      Self::Float(f) => integral(*f).and_then(|n| u64::try_from(n).ok()),
      Self::Text(s) => {
        let digits: String =
          s.trim().chars().filter(|c| !is_group_separator(*c)).collect();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
          return None;
        }
        digits.parse().ok()
      }
    }
  }
}

fn integral(f: f64) -> Option<i64> {
  (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

fn is_group_separator(c: char) -> bool {
  matches!(c, ' ' | '\u{a0}' | '\u{202f}')
}

impl From<&str> for Cell {
  fn from(value: &str) -> Self { Self::Text(value.to_owned()) }
}

impl From<i64> for Cell {
  fn from(value: i64) -> Self { Self::Int(value) }
}

impl From<f64> for Cell {
  fn from(value: f64) -> Self { Self::Float(value) }
}

impl From<&Data> for Cell {
  fn from(data: &Data) -> Self {
    match data {
      Data::Empty => Self::Empty,
      Data::Int(n) => Self::Int(*n),
      Data::Float(f) => Self::Float(*f),
      Data::String(s) => Self::Text(s.clone()),
      other => Self::Text(other.to_string()),
    }
  }
}

// ─── Sheet ───────────────────────────────────────────────────────────────────

/// A named grid of cells. Row and column indices are absolute: row 0 is the
/// sheet's first row and column 0 is column A, whether or not they hold data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
  pub name: String,
  pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
  pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
    Self { name: name.into(), rows }
  }

  /// The first row.
  pub fn header(&self) -> &[Cell] {
    self.rows.first().map(Vec::as_slice).unwrap_or(&[])
  }

  /// The cell at (`row`, `col`); [`Cell::Empty`] outside the grid.
  pub fn cell(&self, row: usize, col: usize) -> &Cell {
    self
      .rows
      .get(row)
      .and_then(|r| r.get(col))
      .unwrap_or(&EMPTY)
  }

  fn from_range(name: String, range: &Range<Data>) -> Self {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut rows = vec![Vec::new(); first_row as usize];
    for row in range.rows() {
      let mut cells = vec![Cell::Empty; first_col as usize];
      cells.extend(row.iter().map(Cell::from));
      rows.push(cells);
    }
    Self { name, rows }
  }
}

// ─── Workbook ────────────────────────────────────────────────────────────────

/// An ordered collection of sheets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
  sheets: Vec<Sheet>,
}

impl Workbook {
  pub fn new(sheets: Vec<Sheet>) -> Self { Self { sheets } }

  /// Decode an `.xlsx` buffer, keeping sheets in workbook order.
  pub fn from_xlsx(bytes: &[u8]) -> Result<Self> {
    let mut xlsx: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let mut sheets = Vec::new();
    for name in xlsx.sheet_names() {
      let range = xlsx.worksheet_range(&name)?;
      sheets.push(Sheet::from_range(name, &range));
    }
    Ok(Self { sheets })
  }

  pub fn sheets(&self) -> &[Sheet] { &self.sheets }

  pub fn sheet(&self, name: &str) -> Option<&Sheet> {
    self.sheets.iter().find(|s| s.name == name)
  }
}
