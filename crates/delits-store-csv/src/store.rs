//! [`CsvCache`]: load-or-build over a single delimited file.

use std::{
  fs,
  future::Future,
  path::{Path, PathBuf},
};

use delits_core::FactTable;
use tracing::{debug, info, warn};

use crate::{COLUMNS, DELIMITER, Error, Result, encode::CacheRow};

// ─── Cache ───────────────────────────────────────────────────────────────────

/// The materialized fact table at a fixed path.
#[derive(Debug, Clone)]
pub struct CsvCache {
  path:          PathBuf,
  force_rebuild: bool,
}

impl CsvCache {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path:          path.into(),
      force_rebuild: false,
    }
  }

  /// Ignore an existing file and always rebuild (the file is then replaced).
  pub fn force_rebuild(mut self, force: bool) -> Self {
    self.force_rebuild = force;
    self
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Return the cached table if the file exists, otherwise run `build` and
  /// persist its result before returning it.
  ///
  /// The existing file is trusted unconditionally: no age or checksum test.
  /// A build error is returned as [`Error::Build`] and nothing is written.
  pub async fn load_or_build<F, Fut, E>(&self, build: F) -> Result<FactTable>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<FactTable, E>>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
  {
    let exists = tokio::fs::try_exists(&self.path)
      .await
      .map_err(|source| self.io_error(source))?;

    if exists && !self.force_rebuild {
      debug!(path = %self.path.display(), "cache hit");
      let table = self.load().await?;
      info!(records = table.len(), "fact table loaded from cache");
      return Ok(table);
    }
    if exists {
      warn!(path = %self.path.display(), "rebuild forced, replacing cache");
    } else {
      debug!(path = %self.path.display(), "cache miss");
    }

    let table = build().await.map_err(|e| Error::Build(e.into()))?;
    self.store(&table).await?;
    info!(
      records = table.len(),
      path = %self.path.display(),
      "fact table built and cached"
    );
    Ok(table)
  }

  /// Read and validate the cache file.
  pub async fn load(&self) -> Result<FactTable> {
    let path = self.path.clone();
    tokio::task::spawn_blocking(move || read_table(&path)).await?
  }

  /// Write `table` to the cache path, replacing any existing file.
  pub async fn store(&self, table: &FactTable) -> Result<()> {
    let path = self.path.clone();
    let table = table.clone();
    tokio::task::spawn_blocking(move || write_table(&path, &table)).await?
  }

  fn io_error(&self, source: std::io::Error) -> Error {
    Error::Io {
      path: self.path.clone(),
      source,
    }
  }
}

// ─── Blocking file access ────────────────────────────────────────────────────

fn read_table(path: &Path) -> Result<FactTable> {
  let corrupt = |reason: String| Error::Corrupt {
    path: path.to_owned(),
    reason,
  };

  let mut reader = csv::ReaderBuilder::new()
    .delimiter(DELIMITER)
    .from_path(path)
    .map_err(|e| read_error(path, e))?;

  let headers = reader.headers().map_err(|e| read_error(path, e))?;
  if !headers.iter().eq(COLUMNS) {
    return Err(corrupt(format!(
      "header is {:?}, expected {:?}",
      headers.iter().collect::<Vec<_>>(),
      COLUMNS
    )));
  }

  let mut records = Vec::new();
  for row in reader.deserialize::<CacheRow>() {
    let row = row.map_err(|e| read_error(path, e))?;
    records.push(row.into_record().map_err(|e| corrupt(e.to_string()))?);
  }

  FactTable::new(records).map_err(|e| corrupt(e.to_string()))
}

/// I/O failures stay I/O errors; anything else the reader reports means the
/// content does not match the schema.
fn read_error(path: &Path, err: csv::Error) -> Error {
  let reason = err.to_string();
  match err.into_kind() {
    csv::ErrorKind::Io(source) => Error::Io {
      path: path.to_owned(),
      source,
    },
    _ => Error::Corrupt {
      path: path.to_owned(),
      reason,
    },
  }
}

/// Write to a sibling temporary file, then rename over `path`. A failure at
/// any step removes the temporary file and leaves `path` untouched.
fn write_table(path: &Path, table: &FactTable) -> Result<()> {
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    fs::create_dir_all(dir).map_err(|source| Error::Io {
      path: dir.to_owned(),
      source,
    })?;
  }

  let tmp = temporary_path(path);
  let result = write_rows(&tmp, table).and_then(|()| {
    fs::rename(&tmp, path).map_err(|source| Error::Io {
      path: path.to_owned(),
      source,
    })
  });
  if result.is_err() {
    let _ = fs::remove_file(&tmp);
  }
  result
}

fn write_rows(tmp: &Path, table: &FactTable) -> Result<()> {
  let write_error = |source| Error::Write {
    path: tmp.to_owned(),
    source,
  };

  let mut writer = csv::WriterBuilder::new()
    .delimiter(DELIMITER)
    .from_path(tmp)
    .map_err(write_error)?;
  if table.is_empty() {
    // Serializing a row is what emits the header, so do it by hand.
    writer.write_record(COLUMNS).map_err(write_error)?;
  }
  for record in table {
    writer.serialize(CacheRow::from(record)).map_err(write_error)?;
  }
  writer.flush().map_err(|source| Error::Io {
    path: tmp.to_owned(),
    source,
  })?;
  Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
  let name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  path.with_file_name(format!(".{name}.tmp"))
}
