use planet_service::config::PlanetConfig;
use planet_service::startup::Application;
use service_core::middleware::metrics::init_metrics;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = PlanetConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "planet-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics();

    if !config.autostart {
        tracing::info!(
            environment = %config.environment,
            "Listener startup suppressed by configuration"
        );
        return Ok(());
    }

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    tracing::info!("Server successfully running on port - {}", app.port());
    app.run_until_stopped().await?;

    Ok(())
}
