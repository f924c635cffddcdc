//! Heliocentric ecliptic → Heliocentric Earth Ecliptic (HEE) conversion.
//!
//! HEE keeps the ecliptic pole as +Z and points +X from the Sun towards the Earth, so a
//! heliocentric ecliptic position becomes HEE after a rotation about Z by minus Earth's
//! ecliptic longitude at the same epoch.

use solarmap_core::vector::{self, Vector3};

use crate::{EphemerisError, EphemerisSample, EphemerisTable};

/// Maximum epoch disagreement tolerated between a target row and the Earth row (days).
const EPOCH_TOLERANCE_DAYS: f64 = 1.0e-6;

/// Express `position_km` in HEE given the heliocentric ecliptic position of the Earth.
pub fn ecliptic_to_hee(position_km: &Vector3, earth_km: &Vector3) -> Vector3 {
    let earth_longitude = earth_km[1].atan2(earth_km[0]);
    vector::rotate_z(position_km, -earth_longitude)
}

/// Rotate every sample of `table` into HEE using the matching Earth sample.
pub fn table_to_hee(
    table: &EphemerisTable,
    earth: &EphemerisTable,
) -> Result<EphemerisTable, EphemerisError> {
    if table.samples.len() != earth.samples.len() {
        return Err(EphemerisError::FrameMismatch {
            target: table.target.clone(),
            reason: format!(
                "{} target samples vs {} Earth samples",
                table.samples.len(),
                earth.samples.len()
            ),
        });
    }

    let samples = table
        .samples
        .iter()
        .zip(&earth.samples)
        .map(|(sample, reference)| {
            if (sample.julian_day_ut - reference.julian_day_ut).abs() > EPOCH_TOLERANCE_DAYS {
                return Err(EphemerisError::FrameMismatch {
                    target: table.target.clone(),
                    reason: format!(
                        "epoch JD {} has no Earth reference (nearest JD {})",
                        sample.julian_day_ut, reference.julian_day_ut
                    ),
                });
            }
            Ok(EphemerisSample {
                position_km: ecliptic_to_hee(&sample.position_km, &reference.position_km),
                ..sample.clone()
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EphemerisTable {
        target: table.target.clone(),
        samples,
    })
}
