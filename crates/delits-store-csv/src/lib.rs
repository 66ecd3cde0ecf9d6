//! Materialized cache of the fact table.
//!
//! The table is kept as a `;`-delimited text file. Once the file exists it is
//! loaded as-is on every start; there is no freshness check. Delete the file
//! (or set `force_rebuild`) to rebuild from source. File access runs on the
//! blocking pool so the async runtime is never stalled.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::{COLUMNS, DELIMITER};
pub use store::CsvCache;
