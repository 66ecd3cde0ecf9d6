//! delits server binary.
//!
//! Reads `delits.toml` (or the path given with `--config`), loads the fact
//! table from the cache file or builds it from the published workbooks, and
//! serves the JSON query API over HTTP.
//!
//! The table is ready before the listener is bound, so no request ever sees a
//! partially built table. Any build failure exits non-zero with the failure
//! kind in the message.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use delits_server::{HttpSource, ServerConfig, build_table};
use delits_store_csv::CsvCache;
use delits_xlsx::PopulationLayout;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "French crime statistics dashboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "delits.toml")]
  config: PathBuf,

  /// Ignore the cache file and rebuild the table from source.
  #[arg(long)]
  rebuild: bool,

  /// Build or load the table, then exit without serving.
  #[arg(long)]
  build_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let source =
    HttpSource::from_config(&server_cfg).context("failed to set up fetching")?;
  let layout = PopulationLayout::default();
  let cache = CsvCache::new(&server_cfg.cache_path)
    .force_rebuild(cli.rebuild || server_cfg.force_rebuild);

  let table = cache
    .load_or_build(|| build_table(&source, &layout))
    .await
    .with_context(|| {
      format!("failed to build fact table (cache: {:?})", cache.path())
    })?;

  tracing::info!(
    records = table.len(),
    departments = table.department_count(),
    "fact table ready"
  );
  if cli.build_only {
    return Ok(());
  }

  let app = delits_api::api_router(table);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
