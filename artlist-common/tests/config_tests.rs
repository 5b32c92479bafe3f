//! Unit tests for configuration resolution
//!
//! Tests cover:
//! - TEST_MODE switching of the default directories
//! - Priority order: overrides > TOML > defaults
//! - Optional vs. explicit config files
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate TEST_MODE are marked with #[serial].

use artlist_common::config::{
    is_test_mode, load_toml_config, parse_toml_config, test_mode_from_env, AppConfig,
    CompiledDefaults, Overrides, TomlConfig, TEST_MODE_VAR,
};
use artlist_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_is_test_mode_accepts_only_true_and_one() {
    assert!(is_test_mode(Some("true")));
    assert!(is_test_mode(Some("1")));
    assert!(!is_test_mode(Some("yes")));
    assert!(!is_test_mode(Some("0")));
    assert!(!is_test_mode(Some("")));
    assert!(!is_test_mode(None));
}

#[test]
#[serial]
fn test_test_mode_from_env() {
    env::set_var(TEST_MODE_VAR, "1");
    assert!(test_mode_from_env());

    env::set_var(TEST_MODE_VAR, "false");
    assert!(!test_mode_from_env());

    env::remove_var(TEST_MODE_VAR);
    assert!(!test_mode_from_env());
}

#[test]
#[serial]
fn test_test_mode_switches_default_directories() {
    env::set_var(TEST_MODE_VAR, "true");
    let config =
        AppConfig::resolve(Overrides::default(), TomlConfig::default(), test_mode_from_env())
            .unwrap();
    env::remove_var(TEST_MODE_VAR);

    assert!(config.test_mode);
    assert_eq!(config.data_dir, PathBuf::from("test_data"));
    assert_eq!(config.images_dir, PathBuf::from("test_images"));
}

#[test]
fn test_production_defaults() {
    let defaults = CompiledDefaults::new(false);
    assert_eq!(defaults.data_dir, PathBuf::from("data"));
    assert_eq!(defaults.images_dir, PathBuf::from("images"));

    let config = AppConfig::resolve(Overrides::default(), TomlConfig::default(), false).unwrap();
    assert_eq!(config.bind.to_string(), "127.0.0.1:8080");
    assert_eq!(config.thumbnail_width, 200);
    assert_eq!(config.fetch_timeout, Duration::from_secs(30));
    assert_eq!(config.log_level, "info");
    assert_eq!(config.static_dir, PathBuf::from("static"));
}

#[test]
fn test_toml_values_override_defaults() {
    let toml = parse_toml_config(
        r#"
        data_dir = "/srv/artlist/data"
        bind = "0.0.0.0:9000"
        thumbnail_width = 320
        fetch_timeout_secs = 5

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    let config = AppConfig::resolve(Overrides::default(), toml, true).unwrap();

    assert_eq!(config.data_dir, PathBuf::from("/srv/artlist/data"));
    // Not set in TOML: test-mode default still applies
    assert_eq!(config.images_dir, PathBuf::from("test_images"));
    assert_eq!(config.bind.port(), 9000);
    assert_eq!(config.thumbnail_width, 320);
    assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_overrides_take_precedence_over_toml() {
    let toml = parse_toml_config("data_dir = \"from-toml\"\nimages_dir = \"toml-images\"").unwrap();
    let overrides = Overrides {
        data_dir: Some(PathBuf::from("from-cli")),
        bind: Some("127.0.0.1:7000".to_string()),
        ..Overrides::default()
    };

    let config = AppConfig::resolve(overrides, toml, false).unwrap();

    assert_eq!(config.data_dir, PathBuf::from("from-cli"));
    assert_eq!(config.images_dir, PathBuf::from("toml-images"));
    assert_eq!(config.bind.port(), 7000);
}

#[test]
fn test_invalid_bind_address_is_config_error() {
    let overrides = Overrides {
        bind: Some("not an address".to_string()),
        ..Overrides::default()
    };
    let result = AppConfig::resolve(overrides, TomlConfig::default(), false);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_zero_thumbnail_width_falls_back_to_default() {
    let toml = parse_toml_config("thumbnail_width = 0").unwrap();
    let config = AppConfig::resolve(Overrides::default(), toml, false).unwrap();
    assert_eq!(config.thumbnail_width, 200);
}

#[test]
fn test_explicit_missing_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");
    assert!(matches!(
        load_toml_config(Some(&missing)),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_malformed_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "data_dir = [unterminated").unwrap();
    assert!(matches!(load_toml_config(Some(&path)), Err(Error::Config(_))));
}

#[test]
fn test_explicit_config_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "images_dir = \"/var/artlist/images\"\n").unwrap();

    let toml = load_toml_config(Some(&path)).unwrap();

    assert_eq!(toml.images_dir, Some(PathBuf::from("/var/artlist/images")));
    assert_eq!(toml.logging.level, "info");
}

#[test]
fn test_ensure_directories_creates_missing() {
    let temp_dir = TempDir::new().unwrap();
    let overrides = Overrides {
        data_dir: Some(temp_dir.path().join("d")),
        images_dir: Some(temp_dir.path().join("i")),
        ..Overrides::default()
    };
    let config = AppConfig::resolve(overrides, TomlConfig::default(), false).unwrap();

    config.ensure_directories().unwrap();

    assert!(temp_dir.path().join("d").is_dir());
    assert!(temp_dir.path().join("i").is_dir());
}
