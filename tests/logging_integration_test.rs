//! Integration tests for logging configuration

use posload::config::{load_config, LoggingConfig};
use std::io::Write;
use tempfile::NamedTempFile;
use test_case::test_case;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_console_only_config() {
    let config = LoggingConfig::console_only();
    assert!(!config.local_enabled);
}

#[test_case("daily", true)]
#[test_case("hourly", true)]
#[test_case("size", false)]
fn test_logging_rotation_types(rotation: &str, accepted: bool) {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "database_target = \"memory\"\n[logging]\nlocal_rotation = \"{rotation}\"\n"
    )
    .unwrap();
    file.flush().unwrap();

    let result = load_config(file.path());
    assert_eq!(result.is_ok(), accepted, "{rotation}");
}

#[test]
fn test_local_path_required_when_enabled() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "database_target = \"memory\"\n[logging]\nlocal_enabled = true\nlocal_path = \"\"\n"
    )
    .unwrap();
    file.flush().unwrap();

    assert!(load_config(file.path()).is_err());
}
