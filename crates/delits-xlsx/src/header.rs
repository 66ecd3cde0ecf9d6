//! Period column headers.
//!
//! Incident columns are named `<prefix>_<year>_<month>`, e.g. `_2022_03`. The
//! prefix carries nothing and may be empty.

use thiserror::Error;

/// Why a header is not a period column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
  #[error("header is blank")]
  Blank,

  #[error("expected 3 underscore-separated tokens, found {0}")]
  TokenCount(usize),

  #[error("year {0:?} is not a number")]
  Year(String),

  #[error("month {0:?} is not a two-digit month")]
  Month(String),
}

/// The (year, month) pair a column holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodColumn {
  pub year:  String,
  pub month: String,
}

impl PeriodColumn {
  pub fn parse(header: &str) -> Result<Self, HeaderError> {
    let header = header.trim();
    if header.is_empty() {
      return Err(HeaderError::Blank);
    }
    let tokens: Vec<&str> = header.split('_').collect();
    let [_prefix, year, month] = tokens.as_slice() else {
      return Err(HeaderError::TokenCount(tokens.len()));
    };

    if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
      return Err(HeaderError::Year((*year).to_owned()));
    }
    let valid_month = month.len() == 2
      && month.bytes().all(|b| b.is_ascii_digit())
      && matches!(month.parse::<u8>(), Ok(1..=12));
    if !valid_month {
      return Err(HeaderError::Month((*month).to_owned()));
    }

    Ok(Self {
      year:  (*year).to_owned(),
      month: (*month).to_owned(),
    })
  }
}
