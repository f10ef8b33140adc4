//! Facade crate for the `Beacon` observability toolkit.
//! Re-exports the logger and report crates and aggregates their initialization.
//! Keep this crate thin: it should compose other crates, not implement bootstrap logic.
//!
//! ## Usage
//! - Add `beacon` with the desired feature flags (`report`/`bridge`).
//! - Call [`init`] for the stock setup, or reach into [`logger`]/[`report`]
//!   for the full builders.

pub use beacon_logger as logger;
#[cfg(feature = "report")]
pub use beacon_report as report;

use beacon_logger::{LevelFilter, Logger};

/// Feature registry for runtime introspection.
pub mod features {
    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "report")]
        "report",
        #[cfg(feature = "bridge")]
        "bridge",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// One-call bootstrap with the stock configuration.
///
/// Installs the error/panic report hooks filtered to this application's
/// frames (with the `report` feature) and a compact console logger at
/// `INFO`, honoring `RUST_LOG` overrides.
///
/// # Errors
/// Returns an error if the hooks or the subscriber are already installed.
pub fn init(name: impl Into<String>) -> Result<Logger, Box<dyn std::error::Error>> {
    let name = name.into();

    // Report hooks first, so logger failures already render nicely.
    #[cfg(feature = "report")]
    {
        // Backtrace symbols carry the library identifier, so the package
        // separator maps to an underscore (see docs/cargo-notes.md).
        beacon_report::install_default(name.replace('-', "_"))?;
    }

    let logger = Logger::builder().name(name).level(LevelFilter::INFO).init()?;
    Ok(logger)
}
