//! Spreadsheet ingestion for the délits dashboard.
//!
//! Turns the wide incident workbook (one sheet per department, one column per
//! month) and the population workbook into a [`FactTable`]. Pure synchronous;
//! the caller fetches the bytes.
//!
//! # Quick start
//!
//! ```no_run
//! use delits_xlsx::{PopulationLayout, PopulationTable, Workbook, normalize};
//!
//! # fn run(incidents: &[u8], population: &[u8]) -> delits_xlsx::Result<()> {
//! let incidents = Workbook::from_xlsx(incidents)?;
//! let population = Workbook::from_xlsx(population)?;
//! let population =
//!   PopulationTable::from_workbook(&population, &PopulationLayout::default())?;
//! let table = normalize(&incidents, &population)?;
//! println!("{} records", table.len());
//! # Ok(())
//! # }
//! ```
//!
//! [`FactTable`]: delits_core::FactTable

pub mod error;
pub mod header;
mod normalize;
pub mod population;
pub mod workbook;

pub use error::{Error, Result};
pub use normalize::{
  INDEX_COLUMNS, LABEL_COLUMN, SheetOutcome, SheetProgress, normalize,
  normalize_with,
};
pub use population::{DepartmentInfo, PopulationLayout, PopulationTable};
pub use workbook::{Cell, Sheet, Workbook};
