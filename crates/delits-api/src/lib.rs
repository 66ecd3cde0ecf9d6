//! JSON query API for the délits dashboard.
//!
//! Exposes an axum [`Router`] over an immutable [`FactTable`]. Every endpoint
//! is a read-only query; the table is shared, never locked.
//!
//! | Method | Path | Query params |
//! |--------|------|--------------|
//! | `GET`  | `/dimensions` | none |
//! | `GET`  | `/ranking` | `year`, `month`, `department`, `direction`, `limit` |
//! | `GET`  | `/regions` | `year`, `month`, `offense`, `scale` |
//! | `GET`  | `/monthly` | `year`, `offense`, `departments` |
//! | `GET`  | `/yearly`  | `offense`, `department` |
//!
//! Filter parameters take a concrete value; omitting one or passing `Tout`
//! leaves that dimension unfiltered.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", delits_api::api_router(table.clone()))
//! ```

pub mod dimensions;
pub mod error;
pub mod ranking;
pub mod regions;
pub mod response;
pub mod trends;

use axum::{Router, routing::get};
use delits_core::FactTable;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use response::{QueryResponse, QueryStatus};

/// Build the API router for `table`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router(table: FactTable) -> Router<()> {
  Router::new()
    .route("/dimensions", get(dimensions::handler))
    .route("/ranking", get(ranking::handler))
    .route("/regions", get(regions::handler))
    .route("/monthly", get(trends::monthly))
    .route("/yearly", get(trends::yearly))
    .layer(TraceLayer::new_for_http())
    .with_state(table)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use delits_core::FactRecord;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  fn record(
    code: &str,
    month: &str,
    offense: &str,
    count: u64,
    name: &str,
    population: u64,
  ) -> FactRecord {
    FactRecord {
      department_code: code.into(),
      department_name: name.into(),
      year: "2020".into(),
      month: month.into(),
      offense_label: offense.into(),
      count,
      population,
    }
  }

  fn table() -> FactTable {
    FactTable::new(vec![
      record("75", "01", "Vol", 10, "Paris", 2_000_000),
      record("75", "02", "Vol", 20, "Paris", 2_000_000),
      record("93", "01", "Vol", 5, "Seine-Saint-Denis", 1_600_000),
      record("93", "01", "Homicides", 1, "Seine-Saint-Denis", 1_600_000),
      record("48", "01", "Vol", 2, "Lozère", 0),
    ])
    .unwrap()
  }

  async fn get_json(uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = api_router(table()).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
  }

  // ── /dimensions ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dimensions_list_every_value_without_wildcard() {
    let (status, body) = get_json("/dimensions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["years"], json!(["2020"]));
    assert_eq!(body["months"], json!(["01", "02"]));
    assert_eq!(body["offenses"], json!(["Homicides", "Vol"]));
    assert_eq!(body["departments"][0], json!({
      "code": "48",
      "name": "Lozère",
      "population": 0,
    }));
    assert_eq!(body["departments"].as_array().unwrap().len(), 3);
  }

  // ── /ranking ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn ranking_defaults_to_descending() {
    let (status, body) = get_json("/ranking").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({
      "status": "ok",
      "rows": [
        { "offense_label": "Vol", "total": 37 },
        { "offense_label": "Homicides", "total": 1 },
      ],
    }));
  }

  #[tokio::test]
  async fn ranking_honours_filters_direction_and_limit() {
    let (_, body) =
      get_json("/ranking?department=93&month=Tout&direction=asc&limit=1").await;
    assert_eq!(body["rows"], json!([{ "offense_label": "Homicides", "total": 1 }]));
  }

  #[tokio::test]
  async fn unknown_direction_is_bad_request() {
    let (status, body) = get_json("/ranking?direction=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sideways"));
  }

  #[tokio::test]
  async fn unmatched_filter_is_empty_not_an_error() {
    let (status, body) = get_json("/ranking?department=2B").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "empty", "rows": [] }));
  }

  // ── /regions ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn regions_raw_counts() {
    let (_, body) = get_json("/regions?offense=Vol").await;
    let totals: Vec<(String, Value)> = body["rows"]
      .as_array()
      .unwrap()
      .iter()
      .map(|r| (r["department_code"].as_str().unwrap().to_owned(), r["value"].clone()))
      .collect();
    assert_eq!(totals, [
      ("48".to_owned(), json!(2)),
      ("75".to_owned(), json!(30)),
      ("93".to_owned(), json!(5)),
    ]);
  }

  #[tokio::test]
  async fn regions_per_inhabitants_reports_null_for_empty_population() {
    let (status, body) = get_json("/regions?offense=Vol&scale=100000").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows[0]["value"], Value::Null);
    assert!((rows[1]["value"].as_f64().unwrap() - 1.5).abs() < 1e-9);
    assert!((rows[2]["value"].as_f64().unwrap() - 0.3125).abs() < 1e-9);
  }

  #[tokio::test]
  async fn zero_scale_gives_zero_rates() {
    let (status, body) = get_json("/regions?offense=Vol&scale=0").await;
    assert_eq!(status, StatusCode::OK);
    let values: Vec<Value> = body["rows"]
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["value"].clone())
      .collect();
    assert_eq!(values, [Value::Null, json!(0.0), json!(0.0)]);
  }

  #[tokio::test]
  async fn non_finite_scale_is_bad_request() {
    for uri in ["/regions?scale=NaN", "/regions?scale=inf"] {
      let (status, body) = get_json(uri).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
      assert!(body["error"].as_str().unwrap().contains("invalid scale"));
    }
  }

  #[tokio::test]
  async fn malformed_numbers_get_a_json_error_body() {
    for uri in ["/regions?scale=abc", "/ranking?limit=abc", "/ranking?limit=-1"] {
      let (status, body) = get_json(uri).await;
      assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
      assert!(body["error"].is_string(), "{uri}: {body}");
    }
  }

  // ── /monthly and /yearly ────────────────────────────────────────────────────

  #[tokio::test]
  async fn monthly_restricts_to_listed_departments() {
    let (_, body) = get_json("/monthly?departments=75,Tout&offense=Vol").await;
    assert_eq!(body["rows"], json!([
      { "department_code": "75", "month": "01", "total": 10 },
      { "department_code": "75", "month": "02", "total": 20 },
    ]));
  }

  #[tokio::test]
  async fn monthly_wildcard_list_means_every_department() {
    let (_, all) = get_json("/monthly?departments=Tout").await;
    let (_, none) = get_json("/monthly").await;
    assert_eq!(all, none);
    assert_eq!(all["rows"].as_array().unwrap().len(), 4);
  }

  #[tokio::test]
  async fn yearly_totals_per_department() {
    let (_, body) = get_json("/yearly?department=93").await;
    assert_eq!(body, json!({
      "status": "ok",
      "rows": [{ "year": "2020", "total": 6 }],
    }));
  }
}
