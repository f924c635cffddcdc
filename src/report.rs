//! Conversion of a `Resolution` into exportable CSV records and JSON documents.

use std::io::{self, Write};

use chrono::NaiveDateTime;
use solarmap_export::locations::{LocationsDocument, SimpleEntry, TrackEntry};
use solarmap_export::samples::{self, Record};

use crate::resolver::Resolution;

const EPOCH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn format_epoch(epoch: &NaiveDateTime) -> String {
    epoch.format(EPOCH_FORMAT).to_string()
}

/// Write every sample of every track as CSV, header included.
pub fn write_samples_csv(writer: &mut dyn Write, resolution: &Resolution) -> io::Result<()> {
    samples::write_header(writer)?;
    for track in resolution.verbose.values() {
        for sample in &track.samples {
            let epoch = format_epoch(&sample.epoch);
            Record {
                object: track.object.tag(),
                epoch: &epoch,
                x_rsun: sample.position[0],
                y_rsun: sample.position[1],
                z_rsun: sample.position[2],
            }
            .write_to(writer)?;
        }
    }
    Ok(())
}

/// Both views of the resolution as a JSON document.
pub fn locations_document(resolution: &Resolution) -> LocationsDocument<'static> {
    let simple = resolution
        .verbose
        .keys()
        .zip(&resolution.simple)
        .map(|(object, xy)| SimpleEntry {
            object: object.tag(),
            x: xy[0],
            y: xy[1],
        })
        .collect();

    let verbose = resolution
        .verbose
        .values()
        .map(|track| TrackEntry {
            object: track.object.tag(),
            epochs: track.samples.iter().map(|s| format_epoch(&s.epoch)).collect(),
            x: track.xs(),
            y: track.ys(),
            z: track.zs(),
        })
        .collect();

    LocationsDocument {
        date: resolution.date.format("%Y-%m-%d").to_string(),
        trail_days: resolution.trail_days,
        simple,
        verbose,
    }
}
