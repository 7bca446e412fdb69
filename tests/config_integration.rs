//! Integration tests for configuration files
//!
//! These tests validate loading and saving on disk:
//! - TOML and JSON round trips
//! - Partial files filled from defaults
//! - Rejected values and fallback to defaults

use std::path::PathBuf;
use tempfile::TempDir;
use weather_kiosk::config::{AppConfig, SourceConfig, SysfsConfig};
use weather_kiosk::error::KioskError;

#[test]
fn test_toml_round_trip_with_sysfs_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = AppConfig::default();
    config.sampling.period_secs = 60;
    config.source = SourceConfig::Sysfs(SysfsConfig {
        w1_device: Some("28-000005e2fdc3".to_string()),
        rain_active_low: true,
        ..SysfsConfig::default()
    });
    config.logging.directory = Some(PathBuf::from("/var/log/weather-kiosk"));

    config.save(&path).unwrap();
    let loaded = AppConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = AppConfig::default();
    config.ui.fullscreen = true;
    config.source = SourceConfig::Simulated {
        failure_rate: 0.25,
        noise: 0.1,
    };

    config.save(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.trim_start().starts_with('{'));
    assert_eq!(AppConfig::load(&path).unwrap(), config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[sampling]\nperiod_secs = 30\n\n[source]\nkind = \"sysfs\"\nrain_active_low = true\n",
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.sampling.period_secs, 30);
    assert_eq!(config.sampling.capacity, 20);
    assert_eq!(config.sampling.long_term_interval, 10);
    match config.source {
        SourceConfig::Sysfs(sysfs) => {
            assert!(sysfs.rain_active_low);
            assert_eq!(sysfs.w1_devices_dir, PathBuf::from("/sys/bus/w1/devices"));
        }
        other => panic!("expected sysfs source, got {:?}", other),
    }
}

#[test]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[sampling]\ncapacity = 0\n").unwrap();

    assert!(matches!(AppConfig::load(&path), Err(KioskError::Config(_))));
    assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();

    assert!(AppConfig::load(&path).is_err());
    assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
    assert_eq!(
        AppConfig::load_or_default(dir.path().join("missing.toml")),
        AppConfig::default()
    );
}
