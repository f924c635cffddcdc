use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use solarmap_config::{ConfigError, ImageFormat, MapConfig, load_config, load_config_or_default};

#[test]
fn defaults_match_the_stock_solar_map() {
    let config = MapConfig::default();
    assert_eq!(config.default_date, NaiveDate::from_ymd_opt(2020, 7, 11).unwrap());
    assert_eq!(config.objects.len(), 10);
    assert_eq!(config.objects.first().map(String::as_str), Some("psp"));
    assert_eq!(config.objects.last().map(String::as_str), Some("sun"));
    assert_eq!(config.trail_days, 50);
    assert_eq!(config.resolution_hours, 24);
    assert!(!config.parallel_queries);
    assert_eq!(config.output.format, ImageFormat::Png);
    assert_eq!(config.horizons.endpoint, solarmap_horizons::DEFAULT_ENDPOINT);
    assert_eq!(config.horizons.timeout_seconds, 60);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("solarmap.toml");
    fs::write(
        &path,
        r#"
default_date = "2021-06-26"
objects = ["sun", "earth"]
trail_days = 0

[output]
format = "svg"
path = "out/map.svg"
"#,
    )
    .unwrap();

    let config = load_config(&path).expect("toml config");
    assert_eq!(config.default_date, NaiveDate::from_ymd_opt(2021, 6, 26).unwrap());
    assert_eq!(config.objects, vec!["sun".to_string(), "earth".to_string()]);
    assert_eq!(config.trail_days, 0, "clamping is left to the resolver");
    assert_eq!(config.resolution_hours, 24);
    assert_eq!(config.output.format, ImageFormat::Svg);
    assert_eq!(config.output.path, PathBuf::from("out/map.svg"));
    assert_eq!(config.output.width, 900);
    assert_eq!(config.horizons.timeout_seconds, 60);
}

#[test]
fn yaml_files_are_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("map.yaml");
    fs::write(
        &path,
        "objects: [psp, solo]\nparallel_queries: true\nhorizons:\n  timeout_seconds: 5\n",
    )
    .unwrap();

    let config = load_config(&path).expect("yaml config");
    assert_eq!(config.objects, vec!["psp".to_string(), "solo".to_string()]);
    assert!(config.parallel_queries);
    assert_eq!(config.horizons.timeout_seconds, 5);
}

#[test]
fn zero_resolution_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "resolution_hours = 0\n").unwrap();
    assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("typo.toml");
    fs::write(&path, "trail_dayz = 3\n").unwrap();
    assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn explicit_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_config_or_default(Some(&missing)),
        Err(ConfigError::Io(_))
    ));
}
