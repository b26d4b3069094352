use question_service::config::QuestionConfig;
use question_service::services::init_metrics;
use question_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = QuestionConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.store.backend,
        "Starting question service"
    );

    // Refuses to bind if the store is unreachable
    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    tracing::info!("Question service stopped");
    Ok(())
}
