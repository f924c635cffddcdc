use std::fs;

use solarmap_export::locations::{LocationsDocument, SimpleEntry, TrackEntry, write_json};
use solarmap_export::samples::{Record, write_header};
use solarmap_export::writer_for_path;

#[test]
fn csv_rows_follow_header_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested/out/samples.csv");

    {
        let mut writer = writer_for_path(&path).expect("writer");
        write_header(&mut *writer).unwrap();
        Record {
            object: "earth",
            epoch: "2021-06-26T00:00:00",
            x_rsun: 215.0321,
            y_rsun: -0.5,
            z_rsun: 0.0,
        }
        .write_to(&mut *writer)
        .unwrap();
    }

    let contents = fs::read_to_string(&path).expect("csv written");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "object,epoch,x_rsun,y_rsun,z_rsun");
    assert_eq!(lines[1], "earth,2021-06-26T00:00:00,215.032100,-0.500000,0.000000");
}

#[test]
fn json_keeps_track_order_and_shape() {
    let document = LocationsDocument {
        date: "2021-06-26".to_string(),
        trail_days: 1,
        simple: vec![
            SimpleEntry { object: "sun", x: 0.0, y: 0.0 },
            SimpleEntry { object: "earth", x: 215.0, y: 0.1 },
        ],
        verbose: vec![
            TrackEntry {
                object: "sun",
                epochs: vec!["2021-06-26T00:00:00".to_string()],
                x: vec![0.0],
                y: vec![0.0],
                z: vec![0.0],
            },
            TrackEntry {
                object: "earth",
                epochs: vec![
                    "2021-06-25T00:00:00".to_string(),
                    "2021-06-26T00:00:00".to_string(),
                ],
                x: vec![214.9, 215.0],
                y: vec![-3.6, 0.1],
                z: vec![0.0, 0.0],
            },
        ],
    };

    let mut buffer = Vec::new();
    write_json(&mut buffer, &document).expect("json written");
    let text = String::from_utf8(buffer).unwrap();

    let sun_at = text.find("\"sun\":").expect("sun key");
    let earth_at = text.find("\"earth\":").expect("earth key");
    assert!(sun_at < earth_at, "verbose keys keep insertion order");

    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["trail_days"], 1);
    assert_eq!(value["simple"][1]["object"], "earth");
    assert_eq!(value["verbose"]["earth"]["x"][1], 215.0);
    assert!(value["verbose"]["earth"].get("object").is_none());
}
