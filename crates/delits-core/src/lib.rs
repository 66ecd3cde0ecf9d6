//! Core types and the aggregation engine for the délits dashboard.
//!
//! No HTTP, spreadsheet or filesystem code lives here. The normalizer, the
//! cache and the API all build on these types.

pub mod department;
pub mod dimensions;
pub mod error;
pub mod filter;
pub mod query;
pub mod record;
pub mod source;
pub mod table;

pub use error::{Error, Result};
pub use record::FactRecord;
pub use table::FactTable;
