use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use steam_recs::api::{create_router, AppState};
use steam_recs::config::Config;
use steam_recs::data::load_datasets;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    // All datasets are immutable after this point; requests only read.
    let datasets = load_datasets(Path::new(&config.data_dir))
        .with_context(|| format!("loading datasets from {}", config.data_dir))?;
    let state = AppState::new(Arc::new(datasets), config.sample_size)?;

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
