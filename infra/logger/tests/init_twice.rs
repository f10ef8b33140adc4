use beacon_logger::{LevelFilter, Logger, LoggerError, LoggerSettings, Style};

#[test]
fn only_one_global_subscriber_per_process() {
    let first = Logger::builder()
        .name("exclusive-subscriber")
        .style(Style::Scoped)
        .level(LevelFilter::WARN)
        .init()
        .expect("first subscriber should install");
    assert!(first.guard().is_none());

    // Any later configuration loses, no matter how it is built.
    let err = Logger::from_settings("late-comer", LoggerSettings::default())
        .expect_err("a second subscriber must be rejected");

    assert!(matches!(err, LoggerError::Subscriber { .. }), "unexpected error: {err}");
    assert!(err.to_string().starts_with("Tracing subscriber error"), "display: {err}");
}
