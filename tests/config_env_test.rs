//! Config environment variable tests
//!
//! Tests use #[serial] because they mutate process-wide env vars.

use ask_kamos::config::{Config, LogFormat, DEFAULT_API_URL};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    for key in [
        "KAMOS_API_URL",
        "KAMOS_API_TOKEN",
        "KAMOS_HOME",
        "LOG_FORMAT",
        "LOG_LEVEL",
        "REQUEST_TIMEOUT_MS",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_env() {
    clear_env();
    let dir = TempDir::new().unwrap();

    let config = Config::for_base_dir(dir.path().to_path_buf());
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.api_token, None);
    assert_eq!(config.timeout_ms, 300_000);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Pretty);
    assert!(!config.silent);
}

#[test]
#[serial]
fn test_token_falls_back_to_env_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "# local secrets\nKAMOS_API_TOKEN='from-file'\n",
    )
    .unwrap();

    let config = Config::for_base_dir(dir.path().to_path_buf());
    assert_eq!(config.api_token.as_deref(), Some("from-file"));
    // The file is read, not loaded into the process environment.
    assert!(env::var("KAMOS_API_TOKEN").is_err());
}

#[test]
#[serial]
fn test_env_token_takes_precedence() {
    clear_env();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "KAMOS_API_TOKEN=from-file\n").unwrap();
    env::set_var("KAMOS_API_TOKEN", "from-env");

    let config = Config::for_base_dir(dir.path().to_path_buf());
    assert_eq!(config.api_token.as_deref(), Some("from-env"));

    clear_env();
}

#[test]
#[serial]
fn test_overrides_from_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    env::set_var("KAMOS_API_URL", "http://localhost:5001/kamos");
    env::set_var("KAMOS_HOME", dir.path());
    env::set_var("LOG_FORMAT", "json");
    env::set_var("REQUEST_TIMEOUT_MS", "1500");

    let config = Config::from_env().unwrap();
    assert_eq!(config.api_url, "http://localhost:5001/kamos");
    assert_eq!(config.base_dir, dir.path());
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.timeout_ms, 1500);
    assert_eq!(
        config.latest_json_path(),
        dir.path().join(".agent/temp/kamos_latest.json")
    );

    clear_env();
}

#[test]
#[serial]
fn test_env_file_token_is_read_literally() {
    clear_env();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "\n# comment line\nKAMOS_API_TOKEN = ab$cd${HOME}==\n",
    )
    .unwrap();

    let config = Config::for_base_dir(dir.path().to_path_buf());
    assert_eq!(config.api_token.as_deref(), Some("ab$cd${HOME}=="));
}
