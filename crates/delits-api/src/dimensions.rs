//! Handler for `GET /dimensions`.

use axum::{Json, extract::State};
use delits_core::{
  FactTable,
  dimensions::{DimensionValues, dimension_values},
};

/// `GET /dimensions`: the selectable values of every filter.
pub async fn handler(State(table): State<FactTable>) -> Json<DimensionValues> {
  Json(dimension_values(&table))
}
