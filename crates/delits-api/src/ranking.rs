//! Handler for `GET /ranking`.

use std::str::FromStr as _;

use axum::{
  Json,
  extract::{Query, State},
};
use delits_core::{
  FactTable,
  filter::DimensionFilter,
  query::{CategoryTotal, RankingQuery, SortDirection, category_ranking},
};
use serde::Deserialize;

use crate::{error::ApiError, response::QueryResponse};

#[derive(Debug, Deserialize, Default)]
pub struct RankingParams {
  pub year:       Option<String>,
  pub month:      Option<String>,
  pub department: Option<String>,
  /// `asc` or `desc`. Defaults to `desc`.
  pub direction:  Option<String>,
  /// Defaults to 10.
  pub limit:      Option<String>,
}

/// `GET /ranking[?year=...][&month=...][&department=...][&direction=asc|desc][&limit=...]`
pub async fn handler(
  State(table): State<FactTable>,
  Query(params): Query<RankingParams>,
) -> Result<Json<QueryResponse<CategoryTotal>>, ApiError> {
  let defaults = RankingQuery::default();

  let direction = match params.direction.as_deref() {
    None => defaults.direction,
    Some(raw) => SortDirection::from_str(raw.trim()).map_err(|_| {
      ApiError::BadRequest(format!(
        "direction {raw:?} is neither \"asc\" nor \"desc\""
      ))
    })?,
  };

  let limit = match params.limit.as_deref() {
    None => defaults.limit,
    Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
      ApiError::BadRequest(format!(
        "limit {raw:?} is not a non-negative integer"
      ))
    })?,
  };

  let query = RankingQuery {
    year: DimensionFilter::from_wire(params.year.as_deref()),
    month: DimensionFilter::from_wire(params.month.as_deref()),
    department: DimensionFilter::from_wire(params.department.as_deref()),
    direction,
    limit,
  };

  Ok(Json(category_ranking(&table, &query).into()))
}
