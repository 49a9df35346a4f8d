use anyhow::{Context, Result};
use phrasebook::{config::Config, server, service::LangService};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("phrasebook=info".parse()?),
        )
        .init();

    info!("Starting phrasebook");

    // Load configuration from environment
    let config = Config::from_env()?;
    info!(
        "Default language: {}, packages: {:?}",
        config.default_lang, config.package_dirs
    );

    // Load and merge every package's phrases
    let (service, report) = LangService::load(&config).await;
    if report.files_failed > 0 {
        info!("{} phrase files could not be loaded", report.files_failed);
    }
    info!("Supported languages: {:?}", service.supported_languages());

    let app = server::router(Arc::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
