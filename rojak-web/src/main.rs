mod config;
mod routes;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use routes::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    let pipeline = config
        .build_pipeline()
        .map_err(|e| format!("Failed to initialize pipeline: {}", e))?;

    info!(
        model = pipeline.translator_name().unwrap_or("none"),
        speech = pipeline.speech_name(),
        "🍛 Starting rojak web server"
    );

    let app = routes::router(AppState::new(pipeline), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("🚀 Server running at http://{}", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
