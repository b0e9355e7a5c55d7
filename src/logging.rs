// Structured Logging Configuration
// "If a failure is not recorded, it will happen again"

use crate::error::{BridgeResult, Failure};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: String,
    /// Whether to include target module names
    pub include_targets: bool,
    /// Whether to enable ANSI colors in output
    pub enable_colors: bool,
    /// Environment filter override
    pub env_filter: Option<String>,
    /// Log file path (optional, logs to stdout if not specified)
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            include_targets: false,
            enable_colors: true,
            env_filter: None,
            file_path: None,
        }
    }
}

/// Logging format options
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = Failure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(Failure::native(format!(
                "Invalid log format: {s}. Valid options: json, pretty, compact"
            ))),
        }
    }
}

/// Initialize logging with the given configuration
pub fn init_logging(config: &LoggingConfig) -> BridgeResult<()> {
    let level = config
        .level
        .parse::<Level>()
        .map_err(|_| Failure::native(format!("Invalid log level: {}", config.level)))?;

    let format = config.format.parse::<LogFormat>()?;

    let env_filter = if let Some(ref filter) = config.env_filter {
        EnvFilter::try_new(filter)
            .map_err(|e| Failure::native(format!("Invalid env filter: {e}")))?
    } else {
        EnvFilter::from_default_env().add_directive(
            format!("bridge_resilience={level}")
                .parse()
                .map_err(|e| Failure::native(format!("Invalid log directive: {e}")))?,
        )
    };

    let subscriber = Registry::default().with(env_filter);

    match format {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_target(config.include_targets);
            if let Some(file) = open_log_file(config)? {
                subscriber.with(layer.with_writer(file)).init();
            } else {
                subscriber.with(layer.with_writer(io::stdout)).init();
            }
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_target(config.include_targets)
                .with_ansi(config.enable_colors);
            if let Some(file) = open_log_file(config)? {
                subscriber.with(layer.with_writer(file)).init();
            } else {
                subscriber.with(layer.with_writer(io::stdout)).init();
            }
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(config.include_targets)
                .with_ansi(config.enable_colors);
            if let Some(file) = open_log_file(config)? {
                subscriber.with(layer.with_writer(file)).init();
            } else {
                subscriber.with(layer.with_writer(io::stdout)).init();
            }
        }
    }

    tracing::info!(
        level = %config.level,
        format = %config.format,
        "Logging initialized"
    );

    Ok(())
}

fn open_log_file(config: &LoggingConfig) -> BridgeResult<Option<Arc<std::fs::File>>> {
    match &config.file_path {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Failure::native(format!("Failed to open log file: {e}")))?;
            Ok(Some(Arc::new(file)))
        }
        None => Ok(None),
    }
}
