use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use solarmap_core::constants::HOURS_PER_DAY;

use crate::EphemerisError;

/// Time format accepted by the Horizons `START_TIME`/`STOP_TIME` parameters.
const HORIZONS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Span of epochs requested for one object: `[target - trail, target]` split into equal intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryWindow {
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
    pub intervals: u32,
}

impl QueryWindow {
    /// Build the window that ends at midnight UTC on `target`.
    ///
    /// `trail_days` and `resolution_hours` are floored at 1. The interval count is
    /// `ceil(trail_days * 24 / resolution_hours)`, so the default resolution of 24 hours
    /// yields one interval per trail day.
    pub fn ending_at(
        target: NaiveDate,
        trail_days: u32,
        resolution_hours: u32,
    ) -> Result<Self, EphemerisError> {
        let trail_days = trail_days.max(1);
        let resolution_hours = resolution_hours.max(1);

        let stop = target.and_time(NaiveTime::MIN);
        let start = stop
            .checked_sub_days(Days::new(u64::from(trail_days)))
            .ok_or(EphemerisError::InvalidWindow { target, trail_days })?;

        let total_hours = u64::from(trail_days) * u64::from(HOURS_PER_DAY);
        let intervals = total_hours.div_ceil(u64::from(resolution_hours)).max(1);
        let intervals =
            u32::try_from(intervals).map_err(|_| EphemerisError::InvalidWindow { target, trail_days })?;

        Ok(Self {
            start,
            stop,
            intervals,
        })
    }

    /// `START_TIME` value in Horizons notation.
    pub fn start_time(&self) -> String {
        self.start.format(HORIZONS_TIME_FORMAT).to_string()
    }

    /// `STOP_TIME` value in Horizons notation.
    pub fn stop_time(&self) -> String {
        self.stop.format(HORIZONS_TIME_FORMAT).to_string()
    }

    /// `STEP_SIZE` value: a unitless count, which Horizons reads as "this many equal intervals".
    pub fn step_size(&self) -> String {
        self.intervals.to_string()
    }

    /// Number of samples Horizons returns for this window (both endpoints included).
    pub fn expected_samples(&self) -> usize {
        self.intervals as usize + 1
    }
}
