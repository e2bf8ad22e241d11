//! Integration tests for configuration resolution
//!
//! Covers the resolution priority (CLI > env > TOML > default) and the
//! rule that a missing or malformed config file never aborts startup.
//!
//! Note: Uses serial_test to prevent environment variable races.
//! Tests that touch LESSONS_API_URL or LESSONS_CONFIG are marked #[serial].

use lessons_common::config::{
    load_toml_config, write_toml_config, ApiBaseResolver, CompiledDefaults, LoggingConfig,
    TomlConfig, API_URL_ENV_VAR, CONFIG_PATH_ENV_VAR,
};
use serial_test::serial;
use std::env;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(API_URL_ENV_VAR);
    env::remove_var(CONFIG_PATH_ENV_VAR);
}

fn write_config(dir: &TempDir, url: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    let config = TomlConfig {
        api_base_url: Some(url.to_string()),
        timeout_secs: Some(5),
        logging: LoggingConfig {
            level: "debug".to_string(),
            log_file: None,
        },
    };
    write_toml_config(&config, &path).unwrap();
    path
}

#[test]
fn test_toml_write_then_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "http://lessons.test");

    let loaded = load_toml_config(&path).unwrap();
    assert_eq!(loaded.api_base_url.as_deref(), Some("http://lessons.test"));
    assert_eq!(loaded.timeout_secs, Some(5));
    assert_eq!(loaded.logging.level, "debug");
}

#[test]
fn test_write_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("lessons").join("config.toml");

    write_toml_config(&TomlConfig::default(), &path).unwrap();
    assert!(path.exists());
}

#[test]
#[serial]
fn test_defaults_without_any_configuration() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let settings = ApiBaseResolver::new()
        .with_config_path(Some(missing))
        .resolve()
        .unwrap();

    let defaults = CompiledDefaults::default();
    assert_eq!(settings.api_base_url, defaults.api_base_url);
    assert_eq!(settings.timeout_secs, defaults.timeout_secs);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn test_toml_file_used_when_no_overrides() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "http://from-file:9000");

    let settings = ApiBaseResolver::new()
        .with_config_path(Some(path))
        .resolve()
        .unwrap();

    assert_eq!(settings.api_base_url, "http://from-file:9000");
    assert_eq!(settings.timeout_secs, 5);
    assert_eq!(settings.logging.level, "debug");
}

#[test]
#[serial]
fn test_env_var_overrides_toml() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "http://from-file:9000");
    env::set_var(API_URL_ENV_VAR, "http://from-env:7000");

    let settings = ApiBaseResolver::new()
        .with_config_path(Some(path))
        .resolve()
        .unwrap();

    assert_eq!(settings.api_base_url, "http://from-env:7000");
    // Non-URL settings still come from the file
    assert_eq!(settings.timeout_secs, 5);
    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env_and_toml() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "http://from-file:9000");
    env::set_var(API_URL_ENV_VAR, "http://from-env:7000");

    let settings = ApiBaseResolver::new()
        .with_cli_url(Some("https://from-cli".to_string()))
        .with_config_path(Some(path))
        .resolve()
        .unwrap();

    assert_eq!(settings.api_base_url, "https://from-cli");
    clear_env();
}

#[test]
#[serial]
fn test_config_env_var_selects_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "http://via-config-env:1234");
    env::set_var(CONFIG_PATH_ENV_VAR, &path);

    let settings = ApiBaseResolver::new().resolve().unwrap();

    assert_eq!(settings.api_base_url, "http://via-config-env:1234");
    clear_env();
}

#[test]
#[serial]
fn test_malformed_toml_falls_back_to_defaults() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "api_base_url = [unterminated").unwrap();

    let settings = ApiBaseResolver::new()
        .with_config_path(Some(path))
        .resolve()
        .unwrap();

    assert_eq!(settings.api_base_url, CompiledDefaults::default().api_base_url);
}

#[test]
#[serial]
fn test_invalid_url_rejected() {
    clear_env();
    let result = ApiBaseResolver::new()
        .with_cli_url(Some("lessons.local".to_string()))
        .resolve();

    assert!(result.is_err());
}
