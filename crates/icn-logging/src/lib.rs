//! Structured logging for ICN peers and simulations
//!
//! # Features
//!
//! - **JSONL Output**: structured JSON lines (default) or pretty console output
//! - **Node Context**: spans opened while a node is driven carry its id
//! - **File Rotation**: daily/hourly/never via tracing-appender
//! - **`RUST_LOG` override** through `EnvFilter`
//!
//! # Quick Start
//!
//! ```ignore
//! use icn_logging::{IcnSubscriberBuilder, LogConfig};
//!
//! // JSONL to console
//! let _guard = IcnSubscriberBuilder::new().init()?;
//!
//! // Pretty output while developing
//! let _guard = IcnSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//! ```

pub mod config;
pub mod context;
pub mod layers;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};
pub use context::{NodeContextData, NodeContextGuard};
pub use layers::{NodeContextExtension, NodeContextLayer};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Global subscriber already set: {0}")]
    AlreadySet(String),
}

/// Builder for configuring and initializing the logging subscriber
///
/// Console output is JSONL by default. Use [`LogConfig::development`] for
/// human-readable output.
#[derive(Debug, Default)]
pub struct IcnSubscriberBuilder {
    config: LogConfig,
}

impl IcnSubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Install the subscriber globally
    ///
    /// The returned guard flushes file output and must be kept alive for
    /// the duration of the program.
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let jsonl = &self.config.jsonl;
        let console = &self.config.console;

        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> =
            vec![NodeContextLayer::new().boxed()];

        if console.enabled && console.pretty {
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_ansi(console.ansi)
                    .with_target(true)
                    .boxed(),
            );
        } else if console.enabled {
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .boxed(),
            );
        }

        let mut guard = None;
        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = file_writer(file_config)?;
            guard = Some(file_guard);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(jsonl.include_spans)
                    .flatten_event(jsonl.flatten_events)
                    .with_file(jsonl.include_location)
                    .with_line_number(jsonl.include_location)
                    .with_writer(writer)
                    .boxed(),
            );
        }

        Registry::default()
            .with(layers)
            .with(env_filter)
            .try_init()
            .map_err(|e| LoggingError::AlreadySet(e.to_string()))?;

        Ok(guard)
    }
}

/// Writer for file output; `Never` truncates a single file, the others roll
fn file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&config.directory)?;
    let pair = match config.rotation {
        RotationStrategy::Never => {
            let path = config.directory.join(format!("{}.log", config.prefix));
            tracing_appender::non_blocking(File::create(path)?)
        }
        RotationStrategy::Daily => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::DAILY,
            &config.directory,
            &config.prefix,
        )),
        RotationStrategy::Hourly => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::HOURLY,
            &config.directory,
            &config.prefix,
        )),
    };
    Ok(pair)
}

/// JSONL to console
pub fn init_default() -> Result<Option<WorkerGuard>, LoggingError> {
    IcnSubscriberBuilder::new().init()
}

/// Verbose pretty console output
pub fn init_development() -> Result<Option<WorkerGuard>, LoggingError> {
    IcnSubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init()
}

/// Minimal output for tests; silently keeps an existing subscriber
pub fn init_testing() {
    let _ = IcnSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}
