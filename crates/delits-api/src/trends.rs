//! Handlers for the time series: `GET /monthly` and `GET /yearly`.

use axum::{
  Json,
  extract::{Query, State},
};
use delits_core::{
  FactTable,
  filter::DimensionFilter,
  query::{
    MonthlyQuery, MonthlyRegionalTotal, TrendQuery, YearlyTotal,
    monthly_by_region, yearly_totals,
  },
};
use serde::Deserialize;

use crate::response::QueryResponse;

// ─── Monthly ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct MonthlyParams {
  pub year:        Option<String>,
  pub offense:     Option<String>,
  /// Comma-separated department codes. Absent, empty or `Tout` means all.
  pub departments: Option<String>,
}

/// `GET /monthly[?year=...][&offense=...][&departments=75,93]`
pub async fn monthly(
  State(table): State<FactTable>,
  Query(params): Query<MonthlyParams>,
) -> Json<QueryResponse<MonthlyRegionalTotal>> {
  let query = MonthlyQuery {
    year:        DimensionFilter::from_wire(params.year.as_deref()),
    offense:     DimensionFilter::from_wire(params.offense.as_deref()),
    departments: DimensionFilter::from_wire_list(params.departments.as_deref()),
  };
  Json(monthly_by_region(&table, &query).into())
}

// ─── Yearly ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct YearlyParams {
  pub offense:    Option<String>,
  pub department: Option<String>,
}

/// `GET /yearly[?offense=...][&department=...]`
pub async fn yearly(
  State(table): State<FactTable>,
  Query(params): Query<YearlyParams>,
) -> Json<QueryResponse<YearlyTotal>> {
  let query = TrendQuery {
    offense:    DimensionFilter::from_wire(params.offense.as_deref()),
    department: DimensionFilter::from_wire(params.department.as_deref()),
  };
  Json(yearly_totals(&table, &query).into())
}
