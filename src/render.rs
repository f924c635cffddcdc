//! Top-down HEE map: figure assembly and drawing through `plotters`.

use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use solarmap_config::ImageFormat;
use solarmap_core::time::month_abbreviation;
use solarmap_core::units::au_to_solar_radii;
use thiserror::Error;

use crate::catalog::{CATALOG, MarkerColor, ObjectId};
use crate::resolver::{Resolution, VerboseLocations};

/// Padding added around the outermost body (solar radii).
pub const MAP_MARGIN_RSUN: f64 = 15.0;
/// The Sun is drawn at a fixed pixel size, not to scale.
pub const SUN_DISK_RADIUS_PX: u32 = 10;
const MARKER_RADIUS_PX: u32 = 5;
const FIGURE_MARGIN_PX: u32 = 20;
const X_LABEL_AREA_PX: u32 = 60;
const Y_LABEL_AREA_PX: u32 = 70;
const LABEL_OFFSET_RSUN: f64 = 1.0;
/// Dash + gap pairs in a reference circle.
const DASHES_PER_CIRCLE: usize = 72;
const POINTS_PER_DASH: usize = 4;

const GOLD: RGBColor = RGBColor(255, 215, 0);
const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);
const PURE_BLUE: RGBColor = RGBColor(0, 0, 255);
const PURE_RED: RGBColor = RGBColor(255, 0, 0);
const DARK_CYAN: RGBColor = RGBColor(0, 191, 191);

/// A body's marker and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub object: ObjectId,
    pub position: (f64, f64),
    pub label: &'static str,
    pub label_position: (f64, f64),
    pub color: MarkerColor,
}

/// Dashed circle centred on the Sun through a planet's current position.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCircle {
    pub object: ObjectId,
    pub radius: f64,
}

/// Connected path through every sample of a body's track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailPath {
    pub object: ObjectId,
    pub points: Vec<(f64, f64)>,
    pub color: MarkerColor,
}

/// Everything drawn on the map; can be drawn onto any `plotters` backend.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFigure {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Half-width of the square view: both axes span `[-limit, limit]`.
    pub limit: f64,
    pub sun: bool,
    pub markers: Vec<Marker>,
    pub reference_circles: Vec<ReferenceCircle>,
    pub trails: Vec<TrailPath>,
}

/// Errors raised while building or drawing a map.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no resolved positions for `{0}`")]
    MissingTrack(ObjectId),
    #[error("track for `{0}` has no samples")]
    EmptyTrack(ObjectId),
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("failed to prepare output {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Title shown above the map, e.g. `Spacecraft Coordinates - 26 / Jun / 2021`.
pub fn map_title(date: NaiveDate) -> String {
    format!(
        "Spacecraft Coordinates - {} / {} / {}",
        date.day(),
        month_abbreviation(date.month()).unwrap_or("?"),
        date.year()
    )
}

/// View half-width framing every simple location plus the margin.
///
/// Starts at 1 AU and is replaced by the outermost coordinate once there is one.
pub fn plot_limit(simple: &[[f64; 2]]) -> f64 {
    let initial = au_to_solar_radii(1.0) + MAP_MARGIN_RSUN;
    simple
        .iter()
        .flat_map(|xy| xy.iter().map(|v| v.abs()))
        .reduce(f64::max)
        .map(|outermost| outermost + MAP_MARGIN_RSUN)
        .unwrap_or(initial)
}

/// Build the map for `objects` from resolved locations.
pub fn render(
    verbose: &VerboseLocations,
    simple: &[[f64; 2]],
    objects: &[ObjectId],
    date: NaiveDate,
    trail_enabled: bool,
) -> Result<MapFigure, RenderError> {
    let mut figure = MapFigure {
        title: map_title(date),
        x_label: "HEE - X / R_sun",
        y_label: "HEE - Y / R_sun",
        limit: plot_limit(simple),
        sun: false,
        markers: Vec::new(),
        reference_circles: Vec::new(),
        trails: Vec::new(),
    };

    for descriptor in CATALOG.iter().filter(|d| objects.contains(&d.id)) {
        let object = descriptor.id;
        let track = verbose
            .get(&object)
            .ok_or(RenderError::MissingTrack(object))?;

        if descriptor.target.is_none() {
            figure.sun = true;
            continue;
        }

        let latest = track.latest().ok_or(RenderError::EmptyTrack(object))?;
        let (x, y) = (latest.position[0], latest.position[1]);
        figure.markers.push(Marker {
            object,
            position: (x, y),
            label: descriptor.label,
            label_position: (x + LABEL_OFFSET_RSUN, y + LABEL_OFFSET_RSUN),
            color: descriptor.marker,
        });

        if descriptor.reference_circle {
            figure.reference_circles.push(ReferenceCircle {
                object,
                radius: x.hypot(y),
            });
        }

        if trail_enabled {
            figure.trails.push(TrailPath {
                object,
                points: track
                    .samples
                    .iter()
                    .map(|s| (s.position[0], s.position[1]))
                    .collect(),
                color: descriptor.trail,
            });
        }
    }

    Ok(figure)
}

/// Build the map for every body in `resolution`.
pub fn render_resolution(resolution: &Resolution) -> Result<MapFigure, RenderError> {
    render(
        &resolution.verbose,
        &resolution.simple,
        &resolution.objects(),
        resolution.date,
        resolution.trail_enabled(),
    )
}

impl MapFigure {
    /// Draw onto an existing drawing area.
    pub fn draw<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        area.fill(&WHITE).map_err(drawing)?;

        let font_family = select_font_family();
        let caption_font = FontDesc::new(font_family, 24.0, FontStyle::Normal);
        let axis_font = FontDesc::new(font_family, 18.0, FontStyle::Normal);
        let label_font = FontDesc::new(font_family, 14.0, FontStyle::Normal);

        let limit = self.limit;
        let titled = area
            .margin(FIGURE_MARGIN_PX, FIGURE_MARGIN_PX, FIGURE_MARGIN_PX, FIGURE_MARGIN_PX)
            .titled(self.title.as_str(), caption_font)
            .map_err(drawing)?;
        let map_area = square_plot_region(titled);
        let mut chart = ChartBuilder::on(&map_area)
            .x_label_area_size(X_LABEL_AREA_PX)
            .y_label_area_size(Y_LABEL_AREA_PX)
            .build_cartesian_2d(-limit..limit, -limit..limit)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .x_desc(self.x_label)
            .y_desc(self.y_label)
            .label_style(label_font.clone())
            .axis_desc_style(axis_font)
            .draw()
            .map_err(drawing)?;

        let dashed = ShapeStyle::from(&BLACK).stroke_width(1);
        for circle in &self.reference_circles {
            chart
                .draw_series(
                    dashed_circle(circle.radius)
                        .into_iter()
                        .map(|dash| PathElement::new(dash, dashed)),
                )
                .map_err(drawing)?;
        }

        for trail in &self.trails {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    trail.points.clone(),
                    ShapeStyle::from(&rgb(trail.color)).stroke_width(1),
                )))
                .map_err(drawing)?;
        }

        if self.sun {
            chart
                .draw_series(std::iter::once(Circle::new(
                    (0.0, 0.0),
                    SUN_DISK_RADIUS_PX,
                    GOLD.filled(),
                )))
                .map_err(drawing)?;
        }

        for marker in &self.markers {
            chart
                .draw_series(std::iter::once(Circle::new(
                    marker.position,
                    MARKER_RADIUS_PX,
                    rgb(marker.color).filled(),
                )))
                .map_err(drawing)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    marker.label.to_string(),
                    marker.label_position,
                    label_font.clone(),
                )))
                .map_err(drawing)?;
        }

        Ok(())
    }

    /// Write the map as a PNG of `size` pixels.
    pub fn save_png(&self, path: &Path, size: (u32, u32)) -> Result<(), RenderError> {
        prepare_parent(path)?;
        let root = BitMapBackend::new(path, size).into_drawing_area();
        self.draw(&root)?;
        root.present().map_err(drawing)
    }

    /// Write the map as an SVG of `size` pixels.
    pub fn save_svg(&self, path: &Path, size: (u32, u32)) -> Result<(), RenderError> {
        prepare_parent(path)?;
        let root = SVGBackend::new(path, size).into_drawing_area();
        self.draw(&root)?;
        root.present().map_err(drawing)
    }

    pub fn save(&self, path: &Path, format: ImageFormat, size: (u32, u32)) -> Result<(), RenderError> {
        match format {
            ImageFormat::Png => self.save_png(path, size),
            ImageFormat::Svg => self.save_svg(path, size),
        }
    }
}

/// Centre the largest region whose plotting square (after the label areas) has equal sides.
fn square_plot_region<DB: DrawingBackend>(area: DrawingArea<DB, Shift>) -> DrawingArea<DB, Shift> {
    let (width, height) = area.dim_in_pixel();
    let side = width
        .saturating_sub(Y_LABEL_AREA_PX)
        .min(height.saturating_sub(X_LABEL_AREA_PX));
    let region = (side + Y_LABEL_AREA_PX, side + X_LABEL_AREA_PX);
    let offset = (
        width.saturating_sub(region.0) / 2,
        height.saturating_sub(region.1) / 2,
    );
    area.shrink(offset, region)
}

/// Alternating dash segments approximating a circle of `radius` around the origin.
fn dashed_circle(radius: f64) -> Vec<Vec<(f64, f64)>> {
    let pieces = DASHES_PER_CIRCLE * 2;
    let step = TAU / pieces as f64;
    (0..pieces)
        .step_by(2)
        .map(|piece| {
            let start = piece as f64 * step;
            (0..=POINTS_PER_DASH)
                .map(|i| {
                    let angle = start + step * i as f64 / POINTS_PER_DASH as f64;
                    (radius * angle.cos(), radius * angle.sin())
                })
                .collect()
        })
        .collect()
}

fn rgb(color: MarkerColor) -> RGBColor {
    match color {
        MarkerColor::Gold => GOLD,
        MarkerColor::Green => DARK_GREEN,
        MarkerColor::Blue => PURE_BLUE,
        MarkerColor::Red => PURE_RED,
        MarkerColor::Black => BLACK,
        MarkerColor::Cyan => DARK_CYAN,
    }
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn prepare_parent(path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

fn drawing<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}
