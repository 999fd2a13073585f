use kbchat::{AppConfig, AppContainer, HttpServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        port = config.port,
        upload_dir = %config.upload_dir.display(),
        workers = config.processing.worker_count,
        "Starting kbchat"
    );

    let container = AppContainer::new(config).await?;
    HttpServer::from_container(&container).run().await?;

    Ok(())
}
