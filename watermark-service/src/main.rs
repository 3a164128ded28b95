use dotenvy::dotenv;
use service_core::observability::init_tracing;
use watermark_service::config::WatermarkConfig;
use watermark_service::services::init_metrics;
use watermark_service::startup::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = WatermarkConfig::load().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "watermark-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    // Must be before any metrics are recorded.
    init_metrics();

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    application.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
