use ficrec_api::{create_router, AppState};
use ficrec_core::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("ficrec_api={},tower_http={}", config.logging.level, config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(config).await?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
