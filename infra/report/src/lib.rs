//! # Report
//!
//! A centralized error-report and panic hook bootstrap built on `color-eyre`.
//! It installs pretty, filtered reports for both `eyre` errors and panics.
//!
//! * Backtrace frames can be filtered to your own crates via
//!   [`ReportHookBuilder::crate_filter`]; symbol-less frames are always kept.
//! * The location and environment sections are off by default to keep
//!   reports compact; re-enable them per application taste.
//! * Span-trace capture pairs with `beacon-logger`'s `span_traces` layer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beacon_report::ReportHook;
//!
//! ReportHook::builder()
//!     .crate_filter("my_app")
//!     .install()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{ReportError, ReportErrorExt};
pub use color_eyre::Section;
pub use color_eyre::eyre::{self, Report, Result, WrapErr, eyre};

use color_eyre::config::HookBuilder;

#[derive(Debug)]
struct ReportConfig {
    crate_filters: Vec<String>,
    location_section: bool,
    env_section: bool,
    span_traces: bool,
    panic_section: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            crate_filters: Vec::new(),
            location_section: false,
            env_section: false,
            span_traces: true,
            panic_section: None,
        }
    }
}

/// Marker for the installed global report hooks.
///
/// The hooks are process-global and cannot be uninstalled; there is no handle
/// to keep alive, so [`ReportHookBuilder::install`] returns `()`.
#[derive(Debug)]
pub struct ReportHook;

impl ReportHook {
    /// Returns a new [`ReportHookBuilder`] to configure the global hooks.
    #[must_use = "The builder must be configured before it can be used to install the hooks."]
    pub fn builder() -> ReportHookBuilder {
        ReportHookBuilder { config: ReportConfig::default() }
    }
}

/// A builder for configuring and installing the global error/panic hooks.
#[derive(Debug)]
pub struct ReportHookBuilder {
    config: ReportConfig,
}

impl ReportHookBuilder {
    /// Keeps only backtrace frames whose symbol name starts with `prefix`.
    ///
    /// May be called multiple times; a frame survives when it matches any
    /// configured prefix. Frames without a symbol name are always retained.
    /// With no filters configured, all frames are kept.
    #[must_use = "The builder must be configured before it can be used to install the hooks."]
    pub fn crate_filter(mut self, prefix: impl Into<String>) -> Self {
        self.config.crate_filters.push(prefix.into());
        self
    }

    /// Shows the source-location section in error reports.
    ///
    /// This does not affect the location line of panic messages.
    #[must_use = "The builder must be configured before it can be used to install the hooks."]
    pub const fn location_section(mut self, enabled: bool) -> Self {
        self.config.location_section = enabled;
        self
    }

    /// Shows the environment section in error reports.
    #[must_use = "The builder must be configured before it can be used to install the hooks."]
    pub const fn env_section(mut self, enabled: bool) -> Self {
        self.config.env_section = enabled;
        self
    }

    /// Captures a `SpanTrace` for every report by default.
    ///
    /// Requires `tracing_error::ErrorLayer` to be attached to the subscriber
    /// (see `beacon-logger`'s `span_traces` builder option).
    #[must_use = "The builder must be configured before it can be used to install the hooks."]
    pub const fn span_traces(mut self, enabled: bool) -> Self {
        self.config.span_traces = enabled;
        self
    }

    /// Appends an extra section to panic reports (e.g., an issue-reporting hint).
    #[must_use = "The builder must be configured before it can be used to install the hooks."]
    pub fn panic_section(mut self, section: impl Into<String>) -> Self {
        self.config.panic_section = Some(section.into());
        self
    }

    /// Consumes the builder and installs the global error/panic hooks.
    ///
    /// # Errors
    /// Returns [`ReportError::InvalidConfiguration`] for a blank filter prefix.
    /// Returns [`ReportError::Install`] if the hooks were already installed.
    pub fn install(self) -> Result<(), ReportError> {
        let ReportConfig { crate_filters, location_section, env_section, span_traces, panic_section } =
            self.config;

        if crate_filters.iter().any(|prefix| prefix.trim().is_empty()) {
            return Err(ReportError::InvalidConfiguration {
                message: "Frame filter prefix cannot be blank".into(),
                context: None,
            });
        }

        let mut hooks = HookBuilder::default()
            .display_location_section(location_section)
            .display_env_section(env_section)
            .capture_span_trace_by_default(span_traces);

        if let Some(section) = panic_section {
            hooks = hooks.panic_section(section);
        }

        if !crate_filters.is_empty() {
            hooks = hooks.add_frame_filter(Box::new(move |frames| {
                frames.retain(|frame| {
                    frame
                        .name
                        .as_ref()
                        .is_none_or(|name| {
                            crate_filters.iter().any(|prefix| name.starts_with(prefix.as_str()))
                        })
                });
            }));
        }

        hooks.install().map_err(|report| ReportError::Install {
            message: report.to_string().into(),
            context: None,
        })
    }
}

/// Installs the hooks with the stock configuration: frames filtered to
/// `package_name` (no filtering when blank), location and environment
/// sections hidden.
///
/// Backtrace symbols carry the library identifier, so pass the package name
/// with separators mapped to underscores (e.g. `my_app` for `my-app`).
///
/// # Errors
/// Returns [`ReportError::Install`] if the hooks were already installed.
pub fn install_default(package_name: impl Into<String>) -> Result<(), ReportError> {
    let package_name = package_name.into();

    let mut builder = ReportHook::builder();
    if !package_name.trim().is_empty() {
        builder = builder.crate_filter(package_name);
    }
    builder.install()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_initial_state() {
        let builder = ReportHook::builder();
        assert!(builder.config.crate_filters.is_empty());
        assert!(!builder.config.location_section);
        assert!(!builder.config.env_section);
        assert!(builder.config.span_traces);
        assert!(builder.config.panic_section.is_none());
    }

    #[test]
    fn builder_accumulates_filters() {
        let builder = ReportHook::builder()
            .crate_filter("my_app")
            .crate_filter("my_app_core")
            .location_section(true)
            .panic_section("please file an issue");

        assert_eq!(builder.config.crate_filters, ["my_app", "my_app_core"]);
        assert!(builder.config.location_section);
        assert_eq!(builder.config.panic_section.as_deref(), Some("please file an issue"));
    }

    #[test]
    fn blank_filter_prefix_is_rejected() {
        let err = ReportHook::builder()
            .crate_filter("  ")
            .install()
            .expect_err("blank prefix should fail before installation");
        assert!(matches!(err, ReportError::InvalidConfiguration { .. }));
    }
}
