//! Handler for `GET /regions`, the per-department map figures.

use axum::{
  Json,
  extract::{Query, State},
};
use delits_core::{
  FactTable,
  filter::DimensionFilter,
  query::{RegionalQuery, RegionalTotal, Scale, regional_totals},
};
use serde::Deserialize;

use crate::{error::ApiError, response::QueryResponse};

#[derive(Debug, Deserialize, Default)]
pub struct RegionsParams {
  pub year:    Option<String>,
  pub month:   Option<String>,
  pub offense: Option<String>,
  /// `-1` (default) for raw counts, otherwise the per-inhabitant factor.
  pub scale:   Option<String>,
}

/// `GET /regions[?year=...][&month=...][&offense=...][&scale=...]`
///
/// With a factor, departments of zero population report `null`.
pub async fn handler(
  State(table): State<FactTable>,
  Query(params): Query<RegionsParams>,
) -> Result<Json<QueryResponse<RegionalTotal>>, ApiError> {
  let factor = match params.scale.as_deref() {
    None => Scale::RAW_COUNT_SENTINEL,
    Some(raw) => raw.trim().parse::<f64>().map_err(|_| {
      ApiError::BadRequest(format!("scale {raw:?} is not a number"))
    })?,
  };
  let scale =
    Scale::from_wire(factor).map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let query = RegionalQuery {
    year: DimensionFilter::from_wire(params.year.as_deref()),
    month: DimensionFilter::from_wire(params.month.as_deref()),
    offense: DimensionFilter::from_wire(params.offense.as_deref()),
    scale,
  };

  Ok(Json(regional_totals(&table, &query).into()))
}
