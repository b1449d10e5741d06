use pulsegram::core::config::Config;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.period_secs, 30);
    assert!(config.gpu);
    assert_eq!(config.thermal_zone, 0);
    assert!(config.telegram.is_none());
    assert!(config.notify_command.is_none());
}

#[test]
fn test_config_load_full_file() {
    let file = write_config(
        r#"{
            "period_secs": 10,
            "gpu": false,
            "thermal_zone": 1,
            "telegram": { "token": "123:abc", "chat_id": "-1009" },
            "notify_command": ["jq", "."]
        }"#,
    );

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.period(), Duration::from_secs(10));
    assert!(!config.gpu);
    assert_eq!(config.thermal_zone, 1);
    assert_eq!(config.telegram.as_ref().unwrap().token, "123:abc");
    assert_eq!(
        config.notify_command.as_deref(),
        Some(&["jq".to_string(), ".".to_string()][..])
    );
}

#[test]
fn test_config_partial_file_keeps_defaults() {
    let file = write_config(r#"{ "thermal_zone": 3 }"#);

    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.thermal_zone, 3);
    assert_eq!(config.period_secs, 30);
    assert!(config.gpu);
}

#[test]
fn test_config_zero_period_rejected() {
    let file = write_config(r#"{ "period_secs": 0 }"#);
    assert!(Config::load(Some(file.path())).is_err());
}

#[test]
fn test_config_explicit_missing_file_is_error() {
    let result = Config::load(Some(std::path::Path::new(
        "/definitely/not/here/pulsegram.json",
    )));
    assert!(result.is_err());
}

#[test]
fn test_config_garbage_is_error() {
    let file = write_config("[period]\nsecs = 30");
    assert!(Config::load(Some(file.path())).is_err());
}
