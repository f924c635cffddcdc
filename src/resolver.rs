//! Turns a date and a set of bodies into heliocentric Earth ecliptic tracks in solar radii.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info, warn};
use rayon::prelude::*;
use solarmap_core::units::km_to_solar_radii;
use solarmap_core::vector::{Vector3, scale};
use solarmap_horizons::{EphemerisError, EphemerisSource, QueryWindow};
use thiserror::Error;

use crate::catalog::{CATALOG, ObjectDescriptor, ObjectId};

/// Default hours between consecutive trail samples.
pub const DEFAULT_RESOLUTION_HOURS: u32 = 24;

/// Position at one epoch, in solar radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub epoch: NaiveDateTime,
    pub position: Vector3,
}

/// Full time series for one body, oldest sample first; never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub object: ObjectId,
    pub samples: Vec<PositionSample>,
}

impl Track {
    /// The sample at the target date.
    pub fn latest(&self) -> Option<&PositionSample> {
        self.samples.last()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.position[0]).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.position[1]).collect()
    }

    pub fn zs(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.position[2]).collect()
    }
}

/// Full series keyed by body, iterated in catalog order.
pub type VerboseLocations = BTreeMap<ObjectId, Track>;

/// Output of one resolution run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub date: NaiveDate,
    /// Trail length after clamping.
    pub trail_days: u32,
    /// Latest [x, y] of every resolved body, in catalog order.
    pub simple: Vec<[f64; 2]>,
    pub verbose: VerboseLocations,
}

impl Resolution {
    /// Trails are only worth drawing when more than one day is requested.
    pub fn trail_enabled(&self) -> bool {
        self.trail_days > 1
    }

    /// Bodies present in the result, in catalog order.
    pub fn objects(&self) -> Vec<ObjectId> {
        self.verbose.keys().copied().collect()
    }
}

/// Errors surfaced while resolving positions.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot build query window: {0}")]
    Window(#[source] EphemerisError),
    #[error("ephemeris query for `{object}` failed: {source}")]
    Ephemeris {
        object: ObjectId,
        #[source]
        source: EphemerisError,
    },
    #[error("ephemeris for `{object}` returned no samples")]
    EmptySeries { object: ObjectId },
    #[error("ephemeris for `{object}` ends at {last}, expected {expected}")]
    MissedTargetDate {
        object: ObjectId,
        last: NaiveDateTime,
        expected: NaiveDateTime,
    },
}

/// Clamp a requested trail length to at least one day, warning when it had to be raised.
pub fn clamp_trail_days(requested: i64) -> u32 {
    if requested < 1 {
        warn!("trail length must be 1 day or more (got {requested}); using 1");
        return 1;
    }
    u32::try_from(requested).unwrap_or(u32::MAX)
}

/// Resolve with the default resolution, sequentially.
pub fn resolve<S>(
    source: &S,
    date: NaiveDate,
    objects: &[ObjectId],
    trail_days: i64,
) -> Result<Resolution, ResolveError>
where
    S: EphemerisSource + Sync,
{
    Resolver::new(source).resolve(date, objects, trail_days)
}

/// Coordinate resolver bound to an ephemeris source.
pub struct Resolver<'a, S> {
    source: &'a S,
    resolution_hours: u32,
    parallel: bool,
}

impl<'a, S> Resolver<'a, S>
where
    S: EphemerisSource + Sync,
{
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            resolution_hours: DEFAULT_RESOLUTION_HOURS,
            parallel: false,
        }
    }

    /// Hours between trail samples (floored at 1).
    pub fn resolution_hours(mut self, hours: u32) -> Self {
        self.resolution_hours = hours.max(1);
        self
    }

    /// Fan per-object queries out over the rayon pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Resolve every requested body over `[date - trail_days, date]`.
    ///
    /// Bodies are visited in catalog order whatever the order of `objects`; duplicates
    /// resolve once.
    pub fn resolve(
        &self,
        date: NaiveDate,
        objects: &[ObjectId],
        trail_days: i64,
    ) -> Result<Resolution, ResolveError> {
        let trail_days = clamp_trail_days(trail_days);
        let requested: Vec<&ObjectDescriptor> = CATALOG
            .iter()
            .filter(|descriptor| objects.contains(&descriptor.id))
            .collect();

        info!(
            "Objects: [{}]",
            requested
                .iter()
                .map(|descriptor| descriptor.tag)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let window = QueryWindow::ending_at(date, trail_days, self.resolution_hours)
            .map_err(ResolveError::Window)?;

        let tracks: Vec<Track> = if self.parallel {
            requested
                .par_iter()
                .map(|descriptor| self.track(descriptor, date, &window))
                .collect::<Result<_, _>>()?
        } else {
            requested
                .iter()
                .map(|descriptor| self.track(descriptor, date, &window))
                .collect::<Result<_, _>>()?
        };

        let mut simple = Vec::with_capacity(tracks.len());
        let mut verbose = VerboseLocations::new();
        for track in tracks {
            if let Some(latest) = track.latest() {
                simple.push([latest.position[0], latest.position[1]]);
            }
            verbose.insert(track.object, track);
        }

        Ok(Resolution {
            date,
            trail_days,
            simple,
            verbose,
        })
    }

    fn track(
        &self,
        descriptor: &ObjectDescriptor,
        date: NaiveDate,
        window: &QueryWindow,
    ) -> Result<Track, ResolveError> {
        let object = descriptor.id;
        let expected = date.and_time(NaiveTime::MIN);

        let Some(target) = descriptor.target else {
            return Ok(Track {
                object,
                samples: vec![PositionSample {
                    epoch: expected,
                    position: [0.0; 3],
                }],
            });
        };

        debug!("querying {} as `{}`", descriptor.tag, target.name);
        let table = self
            .source
            .hee_positions(&target, window)
            .map_err(|source| ResolveError::Ephemeris { object, source })?;

        let samples: Vec<PositionSample> = table
            .samples
            .iter()
            .map(|sample| PositionSample {
                epoch: sample.epoch,
                position: scale(&sample.position_km, km_to_solar_radii(1.0)),
            })
            .collect();

        let last = samples
            .last()
            .ok_or(ResolveError::EmptySeries { object })?
            .epoch;
        if last != expected {
            return Err(ResolveError::MissedTargetDate {
                object,
                last,
                expected,
            });
        }

        Ok(Track { object, samples })
    }
}
