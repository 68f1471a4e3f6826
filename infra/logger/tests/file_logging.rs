use charachat_logger::{LevelFilter, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_logging_writes_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("integration-file-logging")
        .json(true)
        .path(&log_dir)
        .level(LevelFilter::INFO)
        .init()?;

    tracing::info!(owner_id = "a1b2c3", "record healed");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let entries = fs::read_dir(&log_dir)?;
    let log_file = entries
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let first = contents.lines().next().expect("log file should not be empty");
    assert!(first.starts_with('{'), "expected a JSON line, got {first}");
    assert!(first.contains("record healed"));

    Ok(())
}
