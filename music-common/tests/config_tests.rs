//! Configuration resolution tests
//!
//! Tests that manipulate SCOPE / PORT / DATABASE_URL are marked with
//! #[serial] so they never observe each other's environment.

use music_common::config::{Config, Overrides, Scope};
use serial_test::serial;
use std::io::Write;

fn clear_env() {
    for var in ["SCOPE", "VERSION", "PORT", "DATABASE_URL"] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = Config::load(&Overrides::default()).unwrap();
    assert_eq!(config.scope, Scope::Local);
    assert_eq!(config.port, 3000);
    assert_eq!(config.database_url, "sqlite://music.db?mode=rwc");
}

#[test]
#[serial]
fn test_scope_and_version_from_environment() {
    clear_env();
    std::env::set_var("SCOPE", "production");
    std::env::set_var("VERSION", "2.0.1");

    let config = Config::load(&Overrides::default()).unwrap();
    assert_eq!(config.scope, Scope::Production);
    assert!(config.productive);
    assert!(!config.job);
    assert_eq!(config.app_version, "2.0.1");

    clear_env();
}

#[test]
#[serial]
fn test_priority_cli_over_env_over_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 7000\ndatabase_url = \"sqlite://from-file.db\"").unwrap();

    let overrides = Overrides {
        scope: Some("test".to_string()),
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };

    // file beats scope defaults
    let config = Config::load(&overrides).unwrap();
    assert_eq!(config.scope, Scope::Test);
    assert_eq!(config.port, 7000);
    assert_eq!(config.database_url, "sqlite://from-file.db");

    // environment beats file
    std::env::set_var("PORT", "7100");
    let config = Config::load(&overrides).unwrap();
    assert_eq!(config.port, 7100);

    // command line beats environment
    let overrides = Overrides {
        port: Some(7200),
        database_url: Some("sqlite::memory:".to_string()),
        ..overrides
    };
    let config = Config::load(&overrides).unwrap();
    assert_eq!(config.port, 7200);
    assert_eq!(config.database_url, "sqlite::memory:");

    clear_env();
}

#[test]
#[serial]
fn test_invalid_port_in_environment() {
    clear_env();
    std::env::set_var("PORT", "eighty");

    let result = Config::load(&Overrides::default());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not a valid port"));

    clear_env();
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env();
    let overrides = Overrides {
        config_file: Some("/nonexistent/music-api.toml".into()),
        ..Default::default()
    };
    assert!(Config::load(&overrides).is_err());
}

#[test]
#[serial]
fn test_zero_connections_rejected() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_connections = 0").unwrap();

    let overrides = Overrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(Config::load(&overrides).is_err());
}
