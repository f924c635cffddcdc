//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod samples {
    use std::io::{self, Write};

    const HEADER: &str = "object,epoch,x_rsun,y_rsun,z_rsun";

    /// Write the sample CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One trail sample of one body.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub object: &'a str,
        pub epoch: &'a str,
        pub x_rsun: f64,
        pub y_rsun: f64,
        pub z_rsun: f64,
    }

    impl<'a> Record<'a> {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{:.6},{:.6},{:.6}",
                self.object, self.epoch, self.x_rsun, self.y_rsun, self.z_rsun,
            )
        }
    }
}

pub mod locations {
    use serde::{Serialize, Serializer};
    use serde_json::to_writer_pretty;
    use std::io::{self, Write};

    /// Latest position of one body.
    #[derive(Debug, Clone, Serialize)]
    pub struct SimpleEntry<'a> {
        pub object: &'a str,
        pub x: f64,
        pub y: f64,
    }

    /// Full series of one body, written as parallel arrays.
    #[derive(Debug, Clone, Serialize)]
    pub struct TrackEntry<'a> {
        #[serde(skip)]
        pub object: &'a str,
        pub epochs: Vec<String>,
        pub x: Vec<f64>,
        pub y: Vec<f64>,
        pub z: Vec<f64>,
    }

    /// JSON document holding both views of a resolution.
    #[derive(Debug, Clone, Serialize)]
    pub struct LocationsDocument<'a> {
        pub date: String,
        pub trail_days: u32,
        pub simple: Vec<SimpleEntry<'a>>,
        /// Written as an object keyed by body, in the order given here.
        #[serde(serialize_with = "ordered_map")]
        pub verbose: Vec<TrackEntry<'a>>,
    }

    /// Write the document as pretty-printed JSON.
    pub fn write_json(writer: &mut dyn Write, document: &LocationsDocument<'_>) -> io::Result<()> {
        to_writer_pretty(&mut *writer, document)?;
        writeln!(writer)
    }

    fn ordered_map<S: Serializer>(tracks: &[TrackEntry<'_>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(tracks.iter().map(|track| (track.object, track)))
    }
}
