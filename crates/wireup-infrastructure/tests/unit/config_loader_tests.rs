//! Configuration loader tests

use std::fs;
use tempfile::TempDir;
use wireup_infrastructure::config::{AppSettings, ConfigLoader, ConfigSource, load_settings};
use wireup_infrastructure::constants::{DEFAULT_LOG_LEVEL, DEFAULT_START_TIMEOUT_MS};
use wireup_infrastructure::logging::parse_log_level;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("wireup.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    let source = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .with_env_prefix("WIREUP_TEST_DEFAULTS")
        .load()
        .unwrap();

    let settings = load_settings(&source).unwrap();
    assert_eq!(settings.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(settings.lifecycle.start_timeout_ms, DEFAULT_START_TIMEOUT_MS);
}

#[test]
fn test_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[wireup.logging]\nlevel = \"debug\"\n\n[wireup.lifecycle]\nstop_timeout_ms = 250\n",
    );

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("WIREUP_TEST_FILE");
    assert_eq!(loader.config_path(), Some(path.as_path()));

    let settings = load_settings(&loader.load().unwrap()).unwrap();
    assert_eq!(settings.logging.level, "debug");
    assert_eq!(settings.lifecycle.stop_timeout_ms, 250);
    assert_eq!(settings.lifecycle.start_timeout_ms, DEFAULT_START_TIMEOUT_MS);
}

#[test]
fn test_resolved_path_is_the_configured_one() {
    let dir = TempDir::new().unwrap();
    let absent = dir.path().join("absent.toml");

    let loader = ConfigLoader::new().with_config_path(&absent);

    assert_eq!(loader.resolved_config_path(), Some(absent.clone()));
    assert!(!absent.exists());
    assert!(loader.load().is_ok());
}

#[test]
fn test_application_sections_are_kept() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[greeter]\nname = \"hello\"\n");

    let source = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("WIREUP_TEST_SECTIONS")
        .load()
        .unwrap();

    assert!(source.contains("greeter.name"));
    assert!(source.contains("wireup.logging.level"));
}

#[test]
fn test_invalid_log_level_rejected() {
    let source = ConfigSource::from_toml_str("[wireup.logging]\nlevel = \"loud\"\n");
    let err = load_settings(&source).unwrap_err();
    assert!(err.to_string().contains("Invalid log level"));
}

#[test]
fn test_zero_timeout_rejected() {
    let source = ConfigSource::from_toml_str("[wireup.lifecycle]\nstart_timeout_ms = 0\n");
    let err = load_settings(&source).unwrap_err();
    assert!(err.to_string().contains("start_timeout_ms"));
}

#[test]
fn test_settings_without_wireup_key_are_defaults() {
    let source = ConfigSource::from_toml_str("[greeter]\nname = \"x\"\n");
    let settings = load_settings(&source).unwrap();
    assert_eq!(settings, AppSettings::default());
}

#[test]
fn test_reload_reads_file_again() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[wireup.logging]\nlevel = \"warn\"\n");
    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("WIREUP_TEST_RELOAD");
    assert_eq!(load_settings(&loader.load().unwrap()).unwrap().logging.level, "warn");

    fs::write(&path, "[wireup.logging]\nlevel = \"error\"\n").unwrap();
    assert_eq!(load_settings(&loader.reload().unwrap()).unwrap().logging.level, "error");
}

#[test]
fn test_saved_settings_load_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");
    let mut settings = AppSettings::default();
    settings.logging.level = "trace".to_string();
    settings.lifecycle.stop_timeout_ms = 1234;

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("WIREUP_TEST_SAVE");
    loader.save_to_file(&settings, &path).unwrap();

    assert!(fs::read_to_string(&path).unwrap().contains("level = \"trace\""));
    assert_eq!(load_settings(&loader.load().unwrap()).unwrap(), settings);
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("saved.toml");

    let err = ConfigLoader::new()
        .save_to_file(&AppSettings::default(), &path)
        .unwrap_err();
    assert!(matches!(err, wireup_domain::error::Error::Io { .. }));
}

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("TRACE").unwrap(), tracing::Level::TRACE);
    assert_eq!(parse_log_level("warning").unwrap(), tracing::Level::WARN);
    assert!(parse_log_level("verbose").is_err());
}
