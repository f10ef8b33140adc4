//! Console logging demo cycling through the level macros.
//!
//! Run with `cargo run -p beacon-logger --example console`.

use beacon_logger::{LevelFilter, Logger, LoggerError, Style};

fn main() -> Result<(), LoggerError> {
    let _logger = Logger::builder()
        .name("console-demo")
        .style(Style::Detailed)
        .level(LevelFilter::TRACE)
        .init()?;

    let span = tracing::info_span!("demo", run = 1);
    let _entered = span.enter();

    tracing::trace!("trace detail");
    tracing::debug!("debug detail");
    tracing::info!("informational event");
    tracing::warn!("something looks off");
    tracing::error!("something failed");

    Ok(())
}
