use crate::error::{LoggerError, LoggerErrorExt};
use crate::{DEFAULT_MAX_FILES, Logger, Rotation, Style};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

const DEFAULT_SETTINGS_STEM: &str = "beacon";
const ENV_PREFIX: &str = "BEACON";

/// A serde-friendly mirror of the [`LoggerBuilder`](crate::LoggerBuilder),
/// suitable for embedding into an application configuration file.
///
/// `level`, `style`, and `rotation` are kept as strings and validated by
/// [`Logger::from_settings`]. `rotation`, `max_files`, and `json` only take
/// effect when `path` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerSettings {
    /// Console layer on/off.
    pub console: bool,
    /// Console preset: `compact`, `detailed`, `pretty`, or `scoped`.
    pub style: String,
    /// Default level directive: `trace`..`error` or `off`.
    pub level: String,
    /// Module-directed filter, e.g. `"myapp=debug,hyper=info"`.
    pub env_filter: Option<String>,
    /// Log file directory; file logging is disabled when absent.
    pub path: Option<PathBuf>,
    /// File rotation: `minutely`, `hourly`, `daily`, or `never`.
    pub rotation: String,
    /// Maximum number of rotated files to keep.
    pub max_files: usize,
    /// JSON formatting for the log file.
    pub json: bool,
    /// Attach `tracing_error::ErrorLayer` for span trace capture.
    pub span_traces: bool,
    /// Forward `log`-crate records (requires the `bridge` cargo feature).
    pub bridge: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            console: true,
            style: "compact".to_owned(),
            level: "info".to_owned(),
            env_filter: None,
            path: None,
            rotation: "daily".to_owned(),
            max_files: DEFAULT_MAX_FILES,
            json: false,
            span_traces: false,
            bridge: false,
        }
    }
}

/// Loads [`LoggerSettings`] from layered sources.
///
/// 1. **Base file**: an optional settings file; defaults to the `beacon` file
///    stem in the current working directory and is skipped when missing.
/// 2. **Environment overrides**: variables prefixed with `BEACON__`, using
///    double underscores as separators (e.g., `BEACON__MAX_FILES=3`).
///
/// # Errors
/// Returns [`LoggerError::Config`] if the sources cannot be assembled or
/// the merged values do not deserialize into [`LoggerSettings`].
pub fn load_settings(path: Option<impl AsRef<Path>>) -> Result<LoggerSettings, LoggerError> {
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_STEM), |p| p.as_ref().to_path_buf());

    let settings = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to assemble settings sources")?
        .try_deserialize::<LoggerSettings>()
        .context("Failed to deserialize logger settings")?;

    Ok(settings)
}

impl Logger {
    /// Validates the string fields of `settings`, applies them to a builder,
    /// and initializes the global subscriber.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for unknown `level`,
    /// `style`, or `rotation` values, or when `bridge` is requested without
    /// the `bridge` cargo feature. Initialization errors are those of
    /// [`LoggerBuilder::init`](crate::LoggerBuilder::init).
    pub fn from_settings(
        name: impl Into<String>,
        settings: LoggerSettings,
    ) -> Result<Self, LoggerError> {
        let level =
            settings.level.parse::<LevelFilter>().map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid level '{}': {e}", settings.level).into(),
                context: None,
            })?;
        let style = settings.style.parse::<Style>()?;
        let rotation = parse_rotation(&settings.rotation)?;

        #[cfg(not(feature = "bridge"))]
        if settings.bridge {
            return Err(LoggerError::InvalidConfiguration {
                message: "Log bridge support is not compiled in (enable the `bridge` feature)"
                    .into(),
                context: None,
            });
        }

        let mut builder = Self::builder()
            .name(name)
            .console(settings.console)
            .style(style)
            .level(level)
            .span_traces(settings.span_traces);

        #[cfg(feature = "bridge")]
        {
            builder = builder.bridge(settings.bridge);
        }

        if let Some(filter) = settings.env_filter {
            builder = builder.env_filter(filter);
        }

        match settings.path {
            Some(path) => {
                let builder =
                    builder.path(path).rotation(rotation).max_files(settings.max_files);
                if settings.json { builder.json().init() } else { builder.init() }
            }
            None => builder.init(),
        }
    }
}

fn parse_rotation(value: &str) -> Result<Rotation, LoggerError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "minutely" => Ok(Rotation::MINUTELY),
        "hourly" => Ok(Rotation::HOURLY),
        "daily" => Ok(Rotation::DAILY),
        "never" => Ok(Rotation::NEVER),
        other => Err(LoggerError::InvalidConfiguration {
            message: format!("Unknown rotation '{other}' (expected minutely|hourly|daily|never)")
                .into(),
            context: None,
        }),
    }
}
