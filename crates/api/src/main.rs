use anyhow::Context;

use chefbook_api::app::{self, services};
use chefbook_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chefbook_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let stores = services::Stores::from_config(&config)
        .await
        .context("failed to connect identity stores")?;
    let gate = services::build_gate(&config.gate, stores).context("failed to build authorization gate")?;

    let app = app::build_app(gate);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
