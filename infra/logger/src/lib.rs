//! # Logger
//!
//! A centralized logging bootstrap for applications built on `tracing`.
//! It provides a unified way to configure console and file logging with
//! rotation, non-blocking I/O, environment-based filtering, and a set of
//! console formatting presets.
//!
//! * [`Style`] selects the console preset: compact, detailed (local-time
//!   timestamps rendered by chrono), pretty, or the custom scoped format.
//! * Use [`LoggerBuilder::env_filter`] to set module-directed filters
//!   (e.g., `"myapp=debug,hyper=info"`), in addition to `RUST_LOG`.
//! * [`LoggerBuilder::span_traces`] attaches `tracing_error::ErrorLayer` so
//!   error reports can carry a `SpanTrace`.
//! * The optional `bridge` feature forwards `log`-crate records into
//!   `tracing` via `tracing-log`.
//! * [`LoggerSettings`] mirrors the builder for file/env-based configuration.
//!
//! ## Example
//!
//! ```rust
//! # use beacon_logger::{LevelFilter, Logger, Style};
//!
//! let _logger = Logger::builder()
//!     .name("my-app")
//!     .style(Style::Detailed)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;
mod format;
mod settings;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use crate::format::ScopedFormat;
pub use crate::settings::{LoggerSettings, load_settings};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub(crate) const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";
// The `time`-crate formatter prints `<unknown time>` on some platforms;
// chrono renders local time reliably (tokio-rs/tracing#2715).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

/// Console formatting preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Compact single-line output.
    #[default]
    Compact,
    /// Compact output plus target, source line, and a local-time timestamp.
    Detailed,
    /// Multi-line pretty output with thread names and ids.
    Pretty,
    /// The custom [`ScopedFormat`] rendering the span scope explicitly.
    Scoped,
}

impl FromStr for Style {
    type Err = LoggerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "detailed" => Ok(Self::Detailed),
            "pretty" => Ok(Self::Pretty),
            "scoped" => Ok(Self::Scoped),
            other => Err(LoggerError::InvalidConfiguration {
                message: format!("Unknown console style '{other}' (expected compact|detailed|pretty|scoped)").into(),
                context: None,
            }),
        }
    }
}

#[derive(Debug)]
pub struct LoggerConfig {
    console: bool,
    style: Style,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
    span_traces: bool,
    #[cfg(feature = "bridge")]
    bridge: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            style: Style::Compact,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
            span_traces: false,
            #[cfg(feature = "bridge")]
            bridge: false,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: std::marker::PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Sets the name of the logger.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder {
            name: WithName(name.into()),
            config: self.config,
            file_state: std::marker::PhantomData,
        }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    /// Configures maximum number of log files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    /// Configures the log file rotation strategy.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Enables JSON formatting for the log file.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self) -> Self {
        self.config.json = true;
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `myapp=debug,hyper=info`).
    ///
    /// Environment variables still override via `RUST_LOG`; this is a programmatic default.
    /// Invalid filters will cause [`LoggerBuilder::init`] to return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables console logging.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Selects the console formatting preset.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn style(mut self, style: Style) -> Self {
        self.config.style = style;
        self
    }

    /// Attaches `tracing_error::ErrorLayer` so span traces can be captured
    /// by error reports (see the `beacon-report` crate).
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn span_traces(mut self, enabled: bool) -> Self {
        self.config.span_traces = enabled;
        self
    }

    /// Forwards `log`-crate records into `tracing`.
    ///
    /// The bridge is installed after the subscriber, capped at the effective
    /// [`LevelFilter`]. It can be installed at most once per process.
    #[cfg(feature = "bridge")]
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn bridge(mut self, enabled: bool) -> Self {
        self.config.bridge = enabled;
        self
    }

    /// Sets the path to log files.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, file_state: std::marker::PhantomData }
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. **Note:** This handle contains a [`WorkerGuard`]
    /// that must be kept alive for the duration of the program to ensure
    /// that non-blocking logs are flushed correctly.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        validate_config(&self.config, &self.name.0)?;

        let env_filter = build_env_filter(&self.config)?;

        let mut layers = Vec::new();

        if self.config.console {
            layers.push(match self.config.style {
                Style::Compact => layer().compact().with_ansi(true).boxed(),
                Style::Detailed => layer()
                    .compact()
                    .with_ansi(true)
                    .with_target(true)
                    .with_line_number(true)
                    .with_timer(local_timer())
                    .boxed(),
                Style::Pretty => layer()
                    .pretty()
                    .with_thread_names(true)
                    .with_thread_ids(true)
                    .with_timer(local_timer())
                    .boxed(),
                Style::Scoped => layer().event_format(ScopedFormat).boxed(),
            });
        }

        if self.config.span_traces {
            layers.push(ErrorLayer::default().boxed());
        }

        let guard = if let Some(path) = self.config.path {
            fs::create_dir_all(&path).map_err(|e| LoggerError::Internal {
                message: e.to_string().into(),
                context: Some(format!("Failed to create path: {}", path.display()).into()),
            })?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.config.rotation)
                .filename_prefix(&self.name.0)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.config.max_files)
                .build(path)?;

            let (non_blocking, g) = tracing_appender::non_blocking(file_appender);

            let file_layer = layer().with_writer(non_blocking).with_ansi(false);

            let boxed =
                if self.config.json { file_layer.json().boxed() } else { file_layer.boxed() };

            layers.push(boxed);
            Some(g)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console, file output, or span traces."
                    .into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        #[cfg(feature = "bridge")]
        if self.config.bridge {
            install_log_bridge()?;
        }

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// This struct holds the background worker guard. Drop this struct only
/// when the application is shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    ///
    /// The `name` serves as the primary identifier for your logs and is used
    /// as a prefix for rolling log files (e.g., `my-app.2023-10-27.log`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use beacon_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("my-app")
    ///     .level(LevelFilter::DEBUG)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            config: LoggerConfig::default(),
            name: NoName,
            file_state: std::marker::PhantomData,
        }
    }

    /// Manually triggers a flush of all pending logs in the non-blocking worker.
    ///
    /// While flushing happens automatically when this handle is dropped, this
    /// method acts as a best-effort synchronization point before shutdown.
    pub fn flush(&self) {
        tracing::debug!("Logger flushed");
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

fn local_timer() -> ChronoLocal {
    ChronoLocal::new(TIMESTAMP_FORMAT.to_owned())
}

#[cfg(feature = "bridge")]
fn install_log_bridge() -> Result<(), LoggerError> {
    use tracing_log::AsLog;

    tracing_log::LogTracer::builder()
        .with_max_level(LevelFilter::current().as_log())
        .init()?;
    Ok(())
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_env_filter(config, env_directives.as_deref())
}

// `RUST_LOG` wins over the programmatic filter when both are present.
fn resolve_env_filter(
    config: &LoggerConfig,
    env_directives: Option<&str>,
) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());

    if let Some(directives) = env_directives.filter(|d| !d.trim().is_empty()) {
        return Ok(builder.parse_lossy(directives));
    }

    match config.env_filter.as_ref() {
        None => Ok(builder.from_env_lossy()),
        Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid env filter '{filter}': {e}").into(),
            context: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn builder_initial_state() {
        let builder = Logger::builder().name("test-app").env_filter("beacon=debug");
        assert!(builder.config.console);
        assert_eq!(builder.config.style, Style::Compact);
        assert_eq!(builder.config.level, LevelFilter::INFO);
        assert_eq!(builder.config.env_filter.as_deref(), Some("beacon=debug"));
        assert!(builder.config.path.is_none());
        assert!(!builder.config.span_traces);
    }

    #[test]
    #[serial]
    fn builder_configuration() -> Result<(), LoggerError> {
        let tmp_dir = tempdir().map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some("Failed to create temp dir".into()),
        })?;
        let log_dir = tmp_dir.path().join("logs");
        let builder = Logger::builder()
            .name("test-app")
            .console(true)
            .style(Style::Pretty)
            .span_traces(true)
            .env_filter("beacon=info")
            .path(log_dir.clone())
            .max_files(5)
            .level(LevelFilter::DEBUG);

        assert!(builder.config.console);
        assert_eq!(builder.config.style, Style::Pretty);
        assert!(builder.config.span_traces);
        assert_eq!(builder.config.level, LevelFilter::DEBUG);
        assert_eq!(builder.config.max_files, 5);
        assert_eq!(builder.config.env_filter.as_deref(), Some("beacon=info"));
        assert_eq!(builder.config.path.as_deref(), Some(log_dir.as_path()));

        Ok(())
    }

    #[test]
    #[serial]
    fn style_parses_case_insensitively() {
        assert_eq!("Compact".parse::<Style>().unwrap(), Style::Compact);
        assert_eq!(" DETAILED ".parse::<Style>().unwrap(), Style::Detailed);
        assert_eq!("pretty".parse::<Style>().unwrap(), Style::Pretty);
        assert_eq!("scoped".parse::<Style>().unwrap(), Style::Scoped);

        let err = "fancy".parse::<Style>().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn rust_log_overrides_programmatic_filter() {
        let config =
            LoggerConfig { env_filter: Some("off".to_owned()), ..LoggerConfig::default() };

        let filter = resolve_env_filter(&config, Some("trace")).expect("valid directives");
        let rendered = filter.to_string();
        assert!(rendered.contains("trace"), "environment directives should win: {rendered}");
        assert!(!rendered.contains("off"), "programmatic filter should be ignored: {rendered}");
    }

    #[test]
    fn blank_rust_log_falls_back_to_programmatic_filter() {
        let config = LoggerConfig {
            env_filter: Some("beacon=debug".to_owned()),
            ..LoggerConfig::default()
        };

        let filter = resolve_env_filter(&config, Some("  ")).expect("valid filter");
        assert!(filter.to_string().contains("beacon=debug"));
    }

    #[test]
    #[serial]
    fn empty_name_is_rejected() {
        let err = Logger::builder().name("  ").init().expect_err("blank name should fail");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn file_logging_setup() -> Result<(), LoggerError> {
        let tmp_dir = tempdir().map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some("Failed to create temp dir".into()),
        })?;
        let log_dir = tmp_dir.path().join("logs");

        let logger =
            Logger::builder().name("test-app").path(&log_dir).level(LevelFilter::INFO).init()?;

        tracing::info!("hello world");
        // Give the background worker a moment, then flush explicitly.
        std::thread::sleep(Duration::from_millis(20));
        logger.flush();

        assert!(log_dir.exists(), "log directory should be created by logger init");

        let entries = fs::read_dir(&log_dir).map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some(format!("Failed to read log directory {}", log_dir.display()).into()),
        })?;

        let has_log = entries
            .flatten()
            .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("log"));

        assert!(has_log, "at least one log file should be created");
        Ok(())
    }
}
