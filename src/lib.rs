//! Heliocentric maps of planets and spacecraft.
//!
//! The resolver asks an ephemeris source (JPL Horizons in production) for each requested
//! body, converts positions to solar radii in the heliocentric Earth ecliptic frame, and
//! the renderer turns the result into a top-down map. Keeping this in a library lets the
//! CLI and tests share it.

pub mod catalog;
pub mod render;
pub mod report;
pub mod resolver;

pub use catalog::{ObjectId, parse_objects};
pub use render::{MapFigure, render, render_resolution};
pub use resolver::{Resolution, Resolver, resolve};
pub use solarmap_config as config;
pub use solarmap_export as export;
pub use solarmap_horizons as ephemeris;
