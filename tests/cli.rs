use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;

fn solarmap() -> Command {
    let mut cmd = Command::cargo_bin("solarmap").expect("solarmap bin");
    cmd.env("SOLARMAP_LOG", "warn");
    cmd
}

#[test]
fn sun_only_map_resolves_without_the_network() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json_path = dir.path().join("locations.json");
    let csv_path = dir.path().join("samples.csv");

    solarmap()
        .current_dir(dir.path())
        .args([
            "26",
            "6",
            "2021",
            "--objects",
            "sun",
            "--trail-days",
            "0",
            "--endpoint",
            "http://127.0.0.1:9/unreachable",
            "--no-plot",
            "--json",
            json_path.to_str().unwrap(),
            "--csv",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("Locations on 2021-06-26"))
        .stdout(contains("sun"));

    let doc: Value = serde_json::from_str(&fs::read_to_string(&json_path).expect("json written"))
        .expect("valid json");
    assert_eq!(doc["date"], "2021-06-26");
    assert_eq!(doc["trail_days"], 1);
    assert_eq!(doc["simple"][0]["object"], "sun");
    assert_eq!(doc["simple"][0]["x"], 0.0);
    assert_eq!(doc["simple"][0]["y"], 0.0);

    let csv = fs::read_to_string(&csv_path).expect("csv written");
    assert_eq!(
        csv,
        "object,epoch,x_rsun,y_rsun,z_rsun\nsun,2021-06-26T00:00:00,0.000000,0.000000,0.000000\n"
    );
}

#[test]
fn unsupported_object_is_rejected_before_any_query() {
    let dir = tempfile::tempdir().expect("tempdir");
    solarmap()
        .current_dir(dir.path())
        .args(["26", "6", "2021", "--objects", "sun,pluto", "--no-plot"])
        .assert()
        .failure()
        .stderr(contains("unsupported object `pluto`"));
}

#[test]
fn impossible_calendar_date_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    solarmap()
        .current_dir(dir.path())
        .args(["31", "2", "2021", "--objects", "sun", "--no-plot"])
        .assert()
        .failure()
        .stderr(contains("invalid date"));
}

#[test]
fn partial_date_is_a_usage_error() {
    solarmap().args(["26", "6"]).assert().failure();
}

#[test]
fn config_file_supplies_the_default_date() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json_path = dir.path().join("out.json");
    fs::write(
        dir.path().join("solarmap.toml"),
        "default_date = \"2019-04-02\"\nobjects = [\"sun\"]\n",
    )
    .expect("write config");

    solarmap()
        .current_dir(dir.path())
        .args(["--no-plot", "--json", json_path.to_str().unwrap()])
        .assert()
        .success();

    let doc: Value = serde_json::from_str(&fs::read_to_string(&json_path).expect("json written"))
        .expect("valid json");
    assert_eq!(doc["date"], "2019-04-02");
    assert_eq!(doc["trail_days"], 50);
}

#[test]
fn invalid_configuration_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("bad.yaml");
    fs::write(&config, "objects: []\n").expect("write config");

    solarmap()
        .current_dir(dir.path())
        .args(["--config", config.to_str().unwrap(), "--no-plot"])
        .assert()
        .failure()
        .stderr(contains("invalid configuration"));
}

#[test]
fn sun_only_map_is_written_as_svg() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svg_path = dir.path().join("maps/m.svg");

    solarmap()
        .current_dir(dir.path())
        .args([
            "26",
            "6",
            "2021",
            "--objects",
            "sun",
            "--output",
            svg_path.to_str().unwrap(),
            "--width",
            "500",
            "--height",
            "400",
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&svg_path).expect("svg written");
    assert!(svg.starts_with("<svg"), "{}", &svg[..svg.len().min(80)]);
    assert!(svg.contains("Spacecraft Coordinates - 26 / Jun / 2021"));
}

#[test]
fn format_flag_names_the_default_output_extension() {
    let dir = tempfile::tempdir().expect("tempdir");

    solarmap()
        .current_dir(dir.path())
        .args(["26", "6", "2021", "--objects", "sun", "--format", "svg"])
        .assert()
        .success();

    let svg = dir.path().join("artifacts/solarmap.svg");
    assert!(fs::metadata(&svg).expect("svg written").len() > 0);
    assert!(!dir.path().join("artifacts/solarmap.png").exists());
}

#[test]
fn format_flag_contradicting_output_extension_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let svg_path = dir.path().join("map.svg");

    solarmap()
        .current_dir(dir.path())
        .args([
            "--objects",
            "sun",
            "--output",
            svg_path.to_str().unwrap(),
            "--format",
            "png",
        ])
        .assert()
        .failure()
        .stderr(contains("does not match output"));

    assert!(!svg_path.exists());
    assert!(!dir.path().join("map.png").exists());
}
