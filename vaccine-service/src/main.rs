use service_core::error::AppError;
use service_core::observability::init_tracing;
use vaccine_service::config::{VaccineConfig, SERVICE_NAME};
use vaccine_service::Application;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = VaccineConfig::load()?;

    init_tracing(SERVICE_NAME, &config.common.log_level);

    tracing::info!(
        service = SERVICE_NAME,
        version = env!("CARGO_PKG_VERSION"),
        environment = config.common.environment.as_str(),
        "Starting vaccine management service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
