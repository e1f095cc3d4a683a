use anyhow::Context;
use chapterize::api::{self, AppState};
use chapterize::{Chapterizer, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = ServerConfig::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let state = AppState::new(Chapterizer::new(config.engine.clone()), config.max_upload_bytes);
    let app = api::router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
