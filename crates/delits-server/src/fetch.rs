//! HTTP [`SourceReader`]: downloads both workbooks with `reqwest`.

use std::time::Duration;

use bytes::Bytes;
use delits_core::source::SourceReader;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::ServerConfig;

#[derive(Debug, Error)]
pub enum FetchError {
  /// Connection, timeout or body read failure.
  #[error("fetch error: {url}: {source}")]
  Transport {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  #[error("fetch error: {url} answered {status}")]
  Status {
    url:    String,
    status: reqwest::StatusCode,
  },

  #[error("fetch error: could not build HTTP client: {0}")]
  Client(#[source] reqwest::Error),
}

/// Reads the incident and population workbooks from their download URLs.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client:         Client,
  incident_url:   String,
  population_url: String,
}

impl HttpSource {
  pub fn new(
    incident_url: impl Into<String>,
    population_url: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self, FetchError> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(FetchError::Client)?;
    Ok(Self {
      client,
      incident_url: incident_url.into(),
      population_url: population_url.into(),
    })
  }

  pub fn from_config(config: &ServerConfig) -> Result<Self, FetchError> {
    Self::new(
      &config.incident_url,
      &config.population_url,
      Duration::from_secs(config.fetch_timeout_secs),
    )
  }

  /// GET `url` and return the whole body. Any non-2xx status is an error.
  async fn download(&self, url: &str) -> Result<Bytes, FetchError> {
    let transport = |source| FetchError::Transport {
      url: url.to_owned(),
      source,
    };

    debug!(url, "downloading");
    let resp = self.client.get(url).send().await.map_err(transport)?;
    if !resp.status().is_success() {
      return Err(FetchError::Status {
        url:    url.to_owned(),
        status: resp.status(),
      });
    }
    let body = resp.bytes().await.map_err(transport)?;
    info!(url, bytes = body.len(), "downloaded");
    Ok(body)
  }
}

impl SourceReader for HttpSource {
  type Error = FetchError;

  async fn incident_workbook(&self) -> Result<Bytes, FetchError> {
    self.download(&self.incident_url).await
  }

  async fn population_workbook(&self) -> Result<Bytes, FetchError> {
    self.download(&self.population_url).await
  }
}
