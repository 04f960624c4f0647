use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies. Output
/// goes to stderr so the terminal views on stdout stay clean.
pub fn init_telemetry(observability: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&observability.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);

    if observability.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!("HerbTrace telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking the operations of one session
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span covering one interactive or scripted session
pub fn create_session_span(view: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "session",
        view = view,
        correlation.id = correlation_id,
    )
}

/// Create a span with the common attributes of a processing step
pub fn create_step_span(step_id: &str, step_number: u32, batch_id: Option<&str>) -> tracing::Span {
    tracing::info_span!(
        "processing_step",
        step.id = step_id,
        step.number = step_number,
        batch.id = batch_id,
    )
}

/// Shutdown telemetry gracefully
pub fn shutdown_telemetry() {
    tracing::debug!("HerbTrace telemetry shutdown complete");
}
