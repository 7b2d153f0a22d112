use dser_logger::{LogRotation, Logger, LoggerSettings};
use serde_json::json;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn settings_drive_file_output() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("settings-logs");

    let settings: LoggerSettings = serde_json::from_value(json!({
        "name": "integration-settings",
        "console": false,
        "level": "debug",
        "path": log_dir,
        "json": true,
        "rotation": "never",
    }))?;
    assert_eq!(settings.rotation, LogRotation::Never);
    assert_eq!(settings.max_files, LoggerSettings::default().max_files);

    let logger = Logger::from_settings(&settings)?;
    tracing::debug!(configuration = "billing::Invoice", "resolved");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let written = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .map(fs::read_to_string)
        .transpose()?
        .unwrap_or_default();

    assert!(written.contains("\"configuration\":\"billing::Invoice\""), "{written}");
    Ok(())
}
