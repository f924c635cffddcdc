//! JPL Horizons ephemeris helpers: vector-table queries, response parsing, and the
//! heliocentric Earth ecliptic frame used by the map.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use reqwest::blocking::Client;
use solarmap_core::vector::Vector3;
use thiserror::Error;

pub mod frame;
pub mod response;
pub mod window;

pub use window::QueryWindow;

/// Public Horizons API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";
/// Default HTTP timeout applied to every query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Horizons command for the Earth geocentre, the +X reference of HEE.
pub const EARTH_REFERENCE_COMMAND: &str = "399";
/// Horizons `CENTER` for the Sun's body centre.
const SUN_CENTER: &str = "500@10";

/// A body Horizons can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    /// Human-readable query name, e.g. `PSP` or `Mars Barycenter`.
    pub name: &'static str,
    /// Value passed as `COMMAND`, e.g. `-96` or `4`.
    pub command: &'static str,
}

/// One row of a vector table.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSample {
    pub epoch: NaiveDateTime,
    /// Julian day on the UT scale, as requested with `TIME_TYPE='UT'`.
    pub julian_day_ut: f64,
    pub position_km: Vector3,
}

/// Time-ordered positions returned for a single target.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisTable {
    pub target: String,
    pub samples: Vec<EphemerisSample>,
}

impl EphemerisTable {
    /// The final (most recent) sample.
    pub fn latest(&self) -> Option<&EphemerisSample> {
        self.samples.last()
    }
}

/// Errors surfaced while querying or decoding ephemerides.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Horizons returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Horizons rejected the query for `{target}`: {message}")]
    Service { target: String, message: String },
    #[error("no ephemeris for `{target}`: {message}")]
    NoEphemeris { target: String, message: String },
    #[error("malformed vector row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
    #[error("failed to decode response JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read vector table: {0}")]
    Csv(#[from] csv::Error),
    #[error("cannot express `{target}` in HEE: {reason}")]
    FrameMismatch { target: String, reason: String },
    #[error("cannot build a {trail_days}-day window ending {target}")]
    InvalidWindow { target: NaiveDate, trail_days: u32 },
}

/// Source of heliocentric Earth ecliptic positions.
///
/// The map only consumes this shape; `HorizonsClient` is the production implementation.
pub trait EphemerisSource {
    /// Positions of `target` over `window` in the HEE frame, in kilometres, oldest first.
    fn hee_positions(
        &self,
        target: &Target,
        window: &QueryWindow,
    ) -> Result<EphemerisTable, EphemerisError>;
}

/// Blocking client for the Horizons REST API.
pub struct HorizonsClient {
    client: Client,
    endpoint: String,
    earth_reference: Mutex<HashMap<QueryWindow, Arc<EphemerisTable>>>,
}

impl HorizonsClient {
    /// Client against the public endpoint with the default timeout.
    pub fn new() -> Result<Self, EphemerisError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    /// Client against an arbitrary endpoint (mirrors, test servers).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EphemerisError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            earth_reference: Mutex::new(HashMap::new()),
        })
    }

    /// Query Sun-centred ecliptic (J2000) position vectors for `command` over `window`.
    pub fn ecliptic_vectors(
        &self,
        command: &str,
        window: &QueryWindow,
    ) -> Result<EphemerisTable, EphemerisError> {
        debug!(
            "Horizons query COMMAND={command} {} .. {} step {}",
            window.start_time(),
            window.stop_time(),
            window.step_size()
        );

        let reply = self
            .client
            .get(&self.endpoint)
            .query(&vector_query(command, window))
            .send()?;
        let status = reply.status();
        let body = reply.text()?;
        if !status.is_success() {
            return Err(response::rejected_reply(command, status.as_u16(), &body));
        }

        response::parse_vectors_response(command, &body)
    }

    /// Earth reference vectors for `window`, fetched once per window and client.
    fn earth_reference(&self, window: &QueryWindow) -> Result<Arc<EphemerisTable>, EphemerisError> {
        if let Some(table) = self.cached_earth_reference(window) {
            return Ok(table);
        }
        let table = Arc::new(self.ecliptic_vectors(EARTH_REFERENCE_COMMAND, window)?);
        self.earth_reference
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(*window, Arc::clone(&table));
        Ok(table)
    }

    fn cached_earth_reference(&self, window: &QueryWindow) -> Option<Arc<EphemerisTable>> {
        self.earth_reference
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(window)
            .cloned()
    }
}

impl EphemerisSource for HorizonsClient {
    fn hee_positions(
        &self,
        target: &Target,
        window: &QueryWindow,
    ) -> Result<EphemerisTable, EphemerisError> {
        let earth = self.earth_reference(window)?;
        let mut ecliptic = self.ecliptic_vectors(target.command, window)?;
        ecliptic.target = target.name.to_string();
        frame::table_to_hee(&ecliptic, &earth)
    }
}

/// Query-string parameters for a Sun-centred ecliptic vector table of `command` over `window`.
pub fn vector_query(command: &str, window: &QueryWindow) -> Vec<(&'static str, String)> {
    vec![
        ("format", "json".to_string()),
        ("COMMAND", quoted(command)),
        ("OBJ_DATA", quoted("NO")),
        ("MAKE_EPHEM", quoted("YES")),
        ("EPHEM_TYPE", quoted("VECTORS")),
        ("CENTER", quoted(SUN_CENTER)),
        ("REF_PLANE", quoted("ECLIPTIC")),
        ("REF_SYSTEM", quoted("ICRF")),
        ("START_TIME", quoted(&window.start_time())),
        ("STOP_TIME", quoted(&window.stop_time())),
        ("STEP_SIZE", quoted(&window.step_size())),
        ("TIME_TYPE", quoted("UT")),
        ("VEC_TABLE", quoted("1")),
        ("VEC_LABELS", quoted("NO")),
        ("OUT_UNITS", quoted("KM-S")),
        ("CSV_FORMAT", quoted("YES")),
    ]
}

fn quoted(value: &str) -> String {
    format!("'{value}'")
}
