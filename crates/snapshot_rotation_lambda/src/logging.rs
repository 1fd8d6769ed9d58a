use serde_json::Value;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// One JSON object per line on stderr. CloudWatch picks both streams up, and
/// fatal errors must land on stderr anyway.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn log_info(component: &str, event: &str, details: Value) {
    tracing::info!(component = component, event = event, details = %details, "{event}");
}

pub fn log_warn(component: &str, event: &str, details: Value) {
    tracing::warn!(component = component, event = event, details = %details, "{event}");
}

pub fn log_error(component: &str, event: &str, details: Value) {
    tracing::error!(component = component, event = event, details = %details, "{event}");
}
