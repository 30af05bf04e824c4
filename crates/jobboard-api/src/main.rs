//! Job board API server
//!
//! Configuration comes from the environment, or from the TOML file named by
//! `JOBBOARD_CONFIG` with environment overrides on top.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use anyhow::Context;
use jobboard_api::{create_router, state::AppState};
use jobboard_core::config::{AppConfig, LoggingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging);

    if config.auth.uses_development_secret() {
        tracing::warn!("JWT_SECRET is not set; tokens are signed with the development secret");
    }

    let store = jobboard_store::connect(&config.database)
        .await
        .context("failed to open the document store")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, store));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Job board API listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn load_config() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("JOBBOARD_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("{},jobboard_api=debug,tower_http=debug", logging.level).into()
    });

    if logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
