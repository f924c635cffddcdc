#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use solarmap::ephemeris::{
    EphemerisError, EphemerisSample, EphemerisSource, EphemerisTable, QueryWindow, Target,
};
use solarmap_core::constants::{AU_KM, SECONDS_PER_DAY};

/// Circular-orbit stand-in for Horizons: each command has a radius (AU), a phase at the
/// window start (radians) and an angular rate (radians per day).
pub struct FakeEphemeris {
    orbits: HashMap<&'static str, (f64, f64, f64)>,
    failing: Vec<&'static str>,
    drop_last_sample: bool,
    pub queries: Mutex<Vec<String>>,
}

impl FakeEphemeris {
    pub fn new() -> Self {
        let orbits = HashMap::from([
            ("1", (0.387, 0.3, 0.0714)),
            ("2", (0.723, 2.1, 0.0279)),
            // Earth-Moon barycentre sits on +X in HEE.
            ("3", (1.0, 0.0, 0.0)),
            ("4", (1.524, -1.2, -0.0155)),
            ("-96", (0.25, 1.0, 0.12)),
            ("-144", (0.9, 2.8, 0.02)),
            ("-234", (0.96, -0.9, 0.001)),
            ("-235", (1.04, 3.0, -0.001)),
            ("-8", (0.99, 0.0, 0.0)),
        ]);
        Self {
            orbits,
            failing: Vec::new(),
            drop_last_sample: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, command: &'static str) -> Self {
        self.failing.push(command);
        self
    }

    pub fn dropping_last_sample(mut self) -> Self {
        self.drop_last_sample = true;
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl EphemerisSource for FakeEphemeris {
    fn hee_positions(
        &self,
        target: &Target,
        window: &QueryWindow,
    ) -> Result<EphemerisTable, EphemerisError> {
        self.queries.lock().unwrap().push(target.command.to_string());

        if self.failing.contains(&target.command) {
            return Err(EphemerisError::Service {
                target: target.command.to_string(),
                message: "Horizons is unavailable".to_string(),
            });
        }
        let (radius_au, phase, rate) = self
            .orbits
            .get(target.command)
            .copied()
            .ok_or_else(|| EphemerisError::NoEphemeris {
                target: target.command.to_string(),
                message: "unknown command".to_string(),
            })?;

        let span = window.stop - window.start;
        let step = span / window.intervals as i32;
        let mut samples: Vec<EphemerisSample> = (0..=window.intervals)
            .map(|i| {
                let epoch = window.start + step * i as i32;
                let days = (epoch - window.start).num_seconds() as f64 / SECONDS_PER_DAY;
                let angle = phase + rate * days;
                let r = radius_au * AU_KM;
                EphemerisSample {
                    epoch,
                    julian_day_ut: 2_451_544.5 + days,
                    position_km: [r * angle.cos(), r * angle.sin(), 0.01 * r],
                }
            })
            .collect();
        if self.drop_last_sample {
            samples.pop();
        }

        Ok(EphemerisTable {
            target: target.name.to_string(),
            samples,
        })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).expect("midnight")
}

pub fn days(n: i64) -> TimeDelta {
    TimeDelta::days(n)
}
