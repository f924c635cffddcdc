//! Core units, constants, and shared primitives for the SolarMAP workspace.

/// Physical constants (kilometres unless stated otherwise).
pub mod constants {
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Nominal solar radius (IAU 2015 Resolution B3) in kilometres.
    pub const SOLAR_RADIUS_KM: f64 = 695_700.0;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Hours per day.
    pub const HOURS_PER_DAY: u32 = 24;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{AU_KM, SOLAR_RADIUS_KM};

    /// Convert kilometres to solar radii.
    #[inline]
    pub fn km_to_solar_radii(v: f64) -> f64 {
        v / SOLAR_RADIUS_KM
    }

    /// Convert astronomical units to solar radii.
    #[inline]
    pub fn au_to_solar_radii(v: f64) -> f64 {
        v * AU_KM / SOLAR_RADIUS_KM
    }
}

/// Calendar helpers shared by the renderer and exporters.
pub mod time {
    const MONTH_ABBREVIATIONS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    /// Three-letter English abbreviation for a 1-based month number.
    pub fn month_abbreviation(month: u32) -> Option<&'static str> {
        month
            .checked_sub(1)
            .and_then(|idx| MONTH_ABBREVIATIONS.get(idx as usize))
            .copied()
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres or solar radii depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Length of the projection onto the XY plane.
    #[inline]
    pub fn planar_norm(v: &Vector3) -> f64 {
        v[0].hypot(v[1])
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Rotate a vector about the Z axis by `angle` radians (positive = counter-clockwise).
    #[inline]
    pub fn rotate_z(v: &Vector3, angle: f64) -> Vector3 {
        let (sin, cos) = angle.sin_cos();
        [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos, v[2]]
    }
}
