use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: Environment,
    pub json_format: bool,
    /// Base level used when `RUST_LOG` is not set.
    pub level: String,
}

impl TracingConfig {
    pub fn from_settings(environment: Environment, logging: &LoggingSettings) -> Self {
        Self {
            environment,
            json_format: logging.json,
            level: logging.level.clone(),
        }
    }

    pub fn default_directives(&self) -> String {
        format!("{},docquiz=debug,tower_http=debug", self.level)
    }
}
