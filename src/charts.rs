//! PNG charts of a [`Report`].

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use plotters::{coord::Shift, element::Pie, prelude::*};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    record::month_code,
    report::Report,
    season::SeasonSeries,
    stats::{direction_percentages, DirectionCount},
};

pub const WIND_DIRECTION_FILE: &str = "pie_wind_direction.png";
pub const MONTHLY_RAIN_FILE: &str = "avg_rain_monthly.png";
pub const SEASONS_FILE: &str = "temp_per_season.png";

#[derive(Debug, Error, Diagnostic)]
pub enum ChartError {
    #[error("Could not create the chart directory {path}")]
    #[diagnostic(code(meteo::chart::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not draw {path}: {message}")]
    #[diagnostic(
        code(meteo::chart::draw),
        help("run without --with-plots to only print the report")
    )]
    Draw { path: String, message: String },
}

fn draw_error<E: std::error::Error + Send + Sync>(
    path: &Path,
) -> impl Fn(DrawingAreaErrorKind<E>) -> ChartError + '_ {
    move |err| ChartError::Draw {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn caption_font() -> TextStyle<'static> {
    ("sans-serif", 40).into_font().into()
}

/// Draw every chart into `dir`, creating it if needed, and return the written files.
pub fn render_all(dir: &Path, report: &Report) -> Result<Vec<PathBuf>, ChartError> {
    std::fs::create_dir_all(dir).map_err(|source| ChartError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::new();

    let path = dir.join(WIND_DIRECTION_FILE);
    if report.directions.is_empty() {
        warn!("no wind direction recorded, skipping {}", path.display());
    } else {
        wind_direction_pie(&path, &report.directions)?;
        written.push(path);
    }

    let path = dir.join(MONTHLY_RAIN_FILE);
    if report.monthly_rain.is_empty() {
        warn!("no month recorded, skipping {}", path.display());
    } else {
        monthly_rain_bars(&path, &report.monthly_rain)?;
        written.push(path);
    }

    let path = dir.join(SEASONS_FILE);
    seasonal_temperatures(&path, &report.seasons)?;
    written.push(path);

    Ok(written)
}

pub fn wind_direction_pie(path: &Path, directions: &[DirectionCount]) -> Result<(), ChartError> {
    let err = draw_error(path);
    let shares = direction_percentages(directions);
    let sizes: Vec<f64> = shares.iter().map(|(_, share)| *share).collect();
    let labels: Vec<&str> = shares.iter().map(|(direction, _)| direction.as_str()).collect();
    let colors: Vec<RGBColor> = (0..shares.len())
        .map(|i| {
            let (r, g, b) = Palette99::COLORS[i % Palette99::COLORS.len()];
            RGBColor(r, g, b)
        })
        .collect();

    let root = BitMapBackend::new(path, (1080, 1080)).into_drawing_area();
    root.fill(&WHITE).map_err(&err)?;
    let root = root
        .titled(
            "Percentage of wind direction throughout the year",
            caption_font(),
        )
        .map_err(&err)?;

    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 30).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 24).into_font().color(&BLACK));
    root.draw(&pie).map_err(&err)?;

    root.present().map_err(&err)?;
    debug!(path = %path.display(), "drew wind direction pie");
    Ok(())
}

pub fn monthly_rain_bars(path: &Path, totals: &[(time::Month, f64)]) -> Result<(), ChartError> {
    let err = draw_error(path);
    let labels: Vec<&str> = totals.iter().map(|(month, _)| month_code(*month)).collect();
    let highest = totals
        .iter()
        .map(|(_, total)| *total)
        .fold(0.0, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE).map_err(&err)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Average Rain per month", caption_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..totals.len()).into_segmented(), 0.0..highest * 1.1)
        .map_err(&err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(totals.len())
        .x_label_formatter(&|position| match position {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                labels.get(*i).copied().unwrap_or_default().to_string()
            }
            SegmentValue::Last => String::new(),
        })
        .x_desc("MONTH")
        .y_desc("RAIN")
        .draw()
        .map_err(&err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.filled())
                .margin(10)
                .data(totals.iter().enumerate().map(|(i, (_, total))| (i, *total))),
        )
        .map_err(&err)?;

    root.present().map_err(&err)?;
    debug!(path = %path.display(), "drew monthly rain bars");
    Ok(())
}

/// Lowest and highest finite temperature of every series, with some room around.
fn temperature_range(seasons: &[SeasonSeries]) -> std::ops::Range<f64> {
    let (low, high) = seasons
        .iter()
        .flat_map(|series| series.high.iter().chain(&series.temp).chain(&series.low))
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
            (low.min(*value), high.max(*value))
        });

    if low > high {
        0.0..1.0
    } else {
        low - 1.0..high + 1.0
    }
}

/// Contiguous runs of finite values with their day, so a line never spans a gap.
fn finite_runs(values: &[f64]) -> Vec<Vec<(usize, f64)>> {
    let mut runs: Vec<Vec<(usize, f64)>> = Vec::new();
    let mut current = Vec::new();
    for (day, value) in values.iter().enumerate() {
        if value.is_finite() {
            current.push((day, *value));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn season_panel<DB: DrawingBackend>(
    panel: &DrawingArea<DB, Shift>,
    series: &SeasonSeries,
    days: usize,
    temperatures: std::ops::Range<f64>,
    (bottom, left, legend): (bool, bool, bool),
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let mut chart = ChartBuilder::on(panel)
        .caption(series.season.name(), ("sans-serif", 28).into_font())
        .margin(10)
        // Only the outer panels carry tick labels
        .x_label_area_size(if bottom { 40 } else { 0 })
        .y_label_area_size(if left { 50 } else { 0 })
        .build_cartesian_2d(0..days, temperatures)?;

    let mut mesh = chart.configure_mesh();
    if bottom {
        mesh.x_desc("Days");
    }
    if left {
        mesh.y_desc("Temperatures");
    }
    mesh.draw()?;

    for (label, values, color) in [
        ("High", &series.high, RED),
        ("Average", &series.temp, GREEN),
        ("Low", &series.low, BLUE),
    ] {
        for (run, points) in finite_runs(values).into_iter().enumerate() {
            let annotation = chart.draw_series(LineSeries::new(points, color))?;
            // One legend entry per line, not per run
            if legend && run == 0 {
                annotation
                    .label(label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }
    }

    if legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

/// 2x2 grid, winter and spring on top, summer and fall below.
pub fn seasonal_temperatures(path: &Path, seasons: &[SeasonSeries]) -> Result<(), ChartError> {
    let err = draw_error(path);
    let days = seasons.iter().map(SeasonSeries::len).max().unwrap_or(0).max(1);
    let temperatures = temperature_range(seasons);

    let root = BitMapBackend::new(path, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE).map_err(&err)?;
    let root = root
        .titled("Seasonal Temperatures", caption_font())
        .map_err(&err)?;

    for (i, (panel, series)) in root.split_evenly((2, 2)).iter().zip(seasons).enumerate() {
        let layout = (i / 2 == 1, i % 2 == 0, i == 1);
        season_panel(panel, series, days, temperatures.clone(), layout).map_err(&err)?;
    }

    root.present().map_err(&err)?;
    debug!(path = %path.display(), "drew seasonal temperatures");
    Ok(())
}
