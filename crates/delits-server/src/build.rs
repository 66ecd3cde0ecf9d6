//! Cold-start pipeline: fetch, decode, join, normalize.

use delits_core::{FactTable, source::SourceReader};
use delits_xlsx::{PopulationLayout, PopulationTable, Workbook, normalize};
use tracing::info;

use crate::error::BuildError;

/// Build the fact table from `source`.
///
/// Both workbooks are fetched concurrently; decoding and normalization run
/// on the blocking pool.
pub async fn build_table<S>(
  source: &S,
  layout: &PopulationLayout,
) -> Result<FactTable, BuildError<S::Error>>
where
  S: SourceReader,
{
  let (incidents, population) =
    tokio::try_join!(source.incident_workbook(), source.population_workbook())
      .map_err(BuildError::Source)?;

  let layout = layout.clone();
  let table = tokio::task::spawn_blocking(move || {
    let population = Workbook::from_xlsx(&population)?;
    let population = PopulationTable::from_workbook(&population, &layout)?;
    info!(departments = population.len(), "population table parsed");

    let incidents = Workbook::from_xlsx(&incidents)?;
    normalize(&incidents, &population)
  })
  .await??;

  info!(
    records = table.len(),
    departments = table.department_count(),
    "fact table normalized"
  );
  Ok(table)
}
