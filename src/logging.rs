//! # Structured Logging Module
//!
//! Environment-aware structured logging for the mapper, plus the structured
//! event helpers the registry and hydrator emit through.

use crate::config::MapperConfig;
use crate::constants::env;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Filter directive the first initialization installed.
static LOGGER_INITIALIZED: OnceLock<String> = OnceLock::new();

/// Initialize structured logging with the environment-derived level.
pub fn init_structured_logging() {
    init_with_level(&get_log_level(&get_environment()));
}

/// Initialize structured logging at the configured `log_level`.
pub fn init_from_config(config: &MapperConfig) {
    init_with_level(&config.log_level);
}

/// Filter directive in effect, if logging was initialized by this crate.
pub fn active_filter() -> Option<&'static str> {
    LOGGER_INITIALIZED.get().map(String::as_str)
}

/// Initialize structured logging; `RUST_LOG` wins over `level` when set.
///
/// Output is JSON when `GRAPH_ODM_LOG_FORMAT=json`. Safe to call repeatedly
/// and alongside a subscriber installed by the host application.
pub fn init_with_level(level: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let directive = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| level.to_string());
        let filter = EnvFilter::new(&directive);
        let json = std::env::var(env::LOG_FORMAT).is_ok_and(|f| f.eq_ignore_ascii_case("json"));

        let layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        };

        // A host application may already own the global subscriber
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(json = json, filter = %directive, "Structured logging initialized");
        directive
    });
}

/// Current environment from environment variables
fn get_environment() -> String {
    std::env::var(env::ENVIRONMENT)
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Log level based on environment, unless set explicitly
fn get_log_level(environment: &str) -> String {
    if let Ok(level) = std::env::var(env::LOG_LEVEL) {
        return level;
    }
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for registry operations
pub fn log_registry_operation(
    operation: &str,
    scope: &str,
    store_class: Option<&str>,
    status: &str,
    candidates: Option<usize>,
) {
    tracing::debug!(
        operation = %operation,
        scope = %scope,
        store_class = store_class,
        status = %status,
        candidates = candidates,
        "REGISTRY_OPERATION"
    );
}

/// Log structured data for one hydration call
pub fn log_hydration_operation(
    store_class: &str,
    target_type: &str,
    fields_assigned: usize,
    links: usize,
    status: &str,
) {
    tracing::debug!(
        store_class = %store_class,
        target_type = %target_type,
        fields_assigned = fields_assigned,
        links = links,
        status = %status,
        "HYDRATION_OPERATION"
    );
}
