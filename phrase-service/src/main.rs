use phrase_service::config::PhraseConfig;
use phrase_service::Application;
use service_core::error::AppError;
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if the provider credential is missing
    let config = PhraseConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    let metrics = init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        port = config.common.port,
        "Starting phrase relay"
    );

    let app = Application::build(config, Some(metrics)).await?;
    app.run_until_stopped().await?;

    Ok(())
}
