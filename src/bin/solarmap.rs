//! Plot the heliocentric positions of planets and spacecraft on a given date.
//!
//! `solarmap 26 6 2021` maps the configured bodies on 26 June 2021; without a date the
//! configuration's `default_date` is used.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;
use solarmap::config::{ImageFormat, MapConfig, load_config_or_default};
use solarmap::ephemeris::HorizonsClient;
use solarmap::export::writer_for_path;
use solarmap::report::{locations_document, write_samples_csv};
use solarmap::{Resolver, parse_objects, render};

const LOG_VAR: &str = "SOLARMAP_LOG";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plot heliocentric positions of planets and spacecraft from JPL Horizons"
)]
struct Cli {
    /// Day of month (day, month and year are given together)
    #[arg(requires_all = ["month", "year"])]
    day: Option<u32>,

    /// Month number, 1-12
    #[arg(requires_all = ["day", "year"])]
    month: Option<u32>,

    /// Year
    #[arg(requires_all = ["day", "month"])]
    year: Option<i32>,

    /// Configuration file (TOML or YAML); defaults to ./solarmap.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated bodies, e.g. sun,earth,psp
    #[arg(long, value_delimiter = ',')]
    objects: Option<Vec<String>>,

    /// Days of orbit trail ending at the date (values below 1 become 1)
    #[arg(long, allow_negative_numbers = true)]
    trail_days: Option<i64>,

    /// Hours between trail samples
    #[arg(long)]
    resolution_hours: Option<u32>,

    /// Image path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Image format (inferred from --output's extension when omitted; must agree with it)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Write every trail sample as CSV (`-` for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write simple and verbose locations as JSON (`-` for stdout)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Query bodies concurrently
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Horizons API endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Resolve and export only; skip the image
    #[arg(long, default_value_t = false)]
    no_plot: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum FormatArg {
    Png,
    Svg,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().filter_or(LOG_VAR, "info")).init();

    let cli = Cli::parse();
    let mut config = load_config_or_default(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli)?;
    config.validate()?;

    let date = target_date(&cli, &config)?;
    let objects = parse_objects(&config.objects)?;

    let client = HorizonsClient::with_endpoint(
        config.horizons.endpoint.clone(),
        Duration::from_secs(config.horizons.timeout_seconds),
    )?;
    let resolution = Resolver::new(&client)
        .resolution_hours(config.resolution_hours)
        .parallel(config.parallel_queries)
        .resolve(date, &objects, config.trail_days)?;

    println!("=== Locations on {date} (HEE, solar radii) ===");
    for (object, xy) in resolution.verbose.keys().zip(&resolution.simple) {
        println!("{:<9} x = {:>10.3}  y = {:>10.3}", object.tag(), xy[0], xy[1]);
    }

    if let Some(path) = &cli.csv {
        let mut writer = writer_for_path(path)
            .with_context(|| format!("opening CSV output {}", path.display()))?;
        write_samples_csv(&mut *writer, &resolution)?;
        writer.flush()?;
    }

    if let Some(path) = &cli.json {
        let mut writer = writer_for_path(path)
            .with_context(|| format!("opening JSON output {}", path.display()))?;
        solarmap::export::locations::write_json(&mut *writer, &locations_document(&resolution))?;
        writer.flush()?;
    }

    if !cli.no_plot {
        let figure = render(
            &resolution.verbose,
            &resolution.simple,
            &objects,
            date,
            resolution.trail_enabled(),
        )?;
        let output = &config.output;
        figure.save(&output.path, output.format, (output.width, output.height))?;
        info!("map written to {}", output.path.display());
    }

    Ok(())
}

fn apply_overrides(config: &mut MapConfig, cli: &Cli) -> anyhow::Result<()> {
    if let Some(objects) = &cli.objects {
        config.objects = objects.clone();
    }
    if let Some(trail_days) = cli.trail_days {
        config.trail_days = trail_days;
    }
    if let Some(hours) = cli.resolution_hours {
        config.resolution_hours = hours;
    }
    if let Some(path) = &cli.output {
        config.output.path = path.clone();
        if let Some(format) = format_from_extension(path) {
            config.output.format = format;
        }
    }
    if let Some(format) = cli.format {
        let format = match format {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Svg => ImageFormat::Svg,
        };
        match &cli.output {
            Some(path) => {
                if format_from_extension(path).is_some_and(|inferred| inferred != format) {
                    bail!(
                        "--format {} does not match output {}",
                        format.extension(),
                        path.display()
                    );
                }
            }
            None => {
                config.output.path.set_extension(format.extension());
            }
        }
        config.output.format = format;
    }
    if let Some(width) = cli.width {
        config.output.width = width;
    }
    if let Some(height) = cli.height {
        config.output.height = height;
    }
    if cli.parallel {
        config.parallel_queries = true;
    }
    if let Some(endpoint) = &cli.endpoint {
        config.horizons.endpoint = endpoint.clone();
    }
    Ok(())
}

fn target_date(cli: &Cli, config: &MapConfig) -> anyhow::Result<NaiveDate> {
    match (cli.day, cli.month, cli.year) {
        (Some(day), Some(month), Some(year)) => NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| anyhow!("invalid date: {day} / {month} / {year}")),
        _ => Ok(config.default_date),
    }
}

fn format_from_extension(path: &Path) -> Option<ImageFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some(ImageFormat::Png),
        "svg" => Some(ImageFormat::Svg),
        _ => None,
    }
}
