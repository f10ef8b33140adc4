use beacon_logger::{LevelFilter, Logger, Rotation, Style};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn rolling_file_carries_name_and_date() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let log_dir = tmp.path().join("logs");

    let logger = Logger::builder()
        .name("rolling-demo")
        .style(Style::Detailed)
        .level(LevelFilter::DEBUG)
        .path(&log_dir)
        .rotation(Rotation::DAILY)
        .max_files(3)
        .init()?;

    assert!(logger.guard().is_some(), "file logging should hold a worker guard");
    tracing::debug!("rolled into the daily file");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let file_name = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .find(|name| name.ends_with(".log"))
        .expect("a rolled log file should exist");

    // `<name>.<date>.log`, e.g. `rolling-demo.2026-08-24.log`.
    let date = file_name
        .strip_prefix("rolling-demo.")
        .and_then(|rest| rest.strip_suffix(".log"))
        .expect("file name should carry the logger name and the log suffix");
    assert_eq!(date.len(), 10, "daily rotation should stamp a YYYY-MM-DD date: {file_name}");
    assert!(date.chars().all(|c| c.is_ascii_digit() || c == '-'), "unexpected date: {date}");

    let contents = fs::read_to_string(log_dir.join(&file_name))?;
    assert!(contents.contains("rolled into the daily file"), "event should reach the file");
    Ok(())
}
