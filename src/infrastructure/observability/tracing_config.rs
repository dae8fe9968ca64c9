pub const DEFAULT_LOG_FILTER: &str = "info,eidos=debug,tower_http=debug";

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Filter directives used when `RUST_LOG` is unset.
    pub filter: String,
}

impl TracingConfig {
    pub fn new(environment: impl Into<String>, json_format: bool, filter: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            json_format,
            filter: filter.into(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("EIDOS_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
