use sevlog::{DeliveryMode, LogConfig, Logger, SeverityLayer};
use std::io::Read;
use tracing_subscriber::layer::SubscriberExt;

fn read_level(dir: &std::path::Path, stem: &str) -> String {
    let mut s = String::new();
    std::fs::File::open(dir.join(format!("{}.log", stem)))
        .expect("open log file")
        .read_to_string(&mut s)
        .expect("read log file");
    s
}

#[test]
fn test_tracing_events_land_in_level_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Logger::new(
        LogConfig::new()
            .with_output_dir(dir.path())
            .with_console(false)
            .with_debug(false),
    );

    let subscriber = tracing_subscriber::registry().with(SeverityLayer::new(logger));
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "app", "file-logging-test: info");
        tracing::warn!(target: "app", "file-logging-test: warn");
        tracing::error!(target: "app", "file-logging-test: error");
    });

    assert!(read_level(dir.path(), "INFO").contains("file-logging-test: info"));
    assert!(read_level(dir.path(), "WARN").contains("file-logging-test: warn"));
    assert!(read_level(dir.path(), "ERROR").contains("file-logging-test: error"));
}

#[test]
fn test_file_lines_have_no_ansi_and_fixed_prefix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Logger::new(
        LogConfig::new()
            .with_output_dir(dir.path())
            .with_console(false)
            .with_debug(false),
    );

    logger.info("prefix-check");

    let content = read_level(dir.path(), "INFO");
    assert!(!content.contains("\x1b"), "ANSI escape found in log file");

    // [INFO] [YYYY-MM-DD HH:MM:SS] - prefix-check
    let line = content.lines().next().expect("one line");
    assert!(line.starts_with("[INFO] ["));
    let stamp = &line["[INFO] [".len().."[INFO] [".len() + 19];
    assert_eq!(stamp.len(), 19);
    assert!(stamp.chars().enumerate().all(|(i, c)| match i {
        4 | 7 => c == '-',
        10 => c == ' ',
        13 | 16 => c == ':',
        _ => c.is_ascii_digit(),
    }));
    assert_eq!(&line["[INFO] [".len() + 19..], "] - prefix-check");
}

#[test]
fn test_debug_configuration_includes_call_site() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logger = Logger::new(
        LogConfig::new()
            .with_output_dir(dir.path())
            .with_console(false)
            .with_debug(true),
    );

    sevlog::log_warn!(logger, "with origin");

    let content = read_level(dir.path(), "WARN");
    assert!(content.contains("(logging_file_tests:"), "got: {}", content);
    assert!(content.ends_with(") - with origin\n"));
}

#[test]
fn test_output_dir_is_created_and_existing_files_are_kept() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("output");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("INFO.log"), "from a previous run\n").unwrap();

    for _ in 0..3 {
        let logger = Logger::new(
            LogConfig::new()
                .with_output_dir(&out)
                .with_mode(DeliveryMode::Queued)
                .with_console(false),
        );
        let _guard = logger.guard().expect("start");
        logger.info("again");
    }

    let content = read_level(&out, "INFO");
    assert!(content.starts_with("from a previous run\n"));
    assert_eq!(content.matches("- again\n").count(), 3);
}
