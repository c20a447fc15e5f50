//! Filling of missing cells.
//!
//! Months are filled with a fixed default. Temperatures are interpolated from
//! their neighbours: a window of [`WINDOW_RADIUS`] rows on each side of the
//! hole is taken, and a cubic spline is fitted through the known values of
//! that window. The table is walked once from top to bottom and every filled
//! value is written back immediately, so the window of row `i + 1` already
//! sees the value computed for row `i`.

use std::{fmt, ops::AddAssign};

use miette::Diagnostic;
use thiserror::Error;
use time::Month;
use tracing::{debug, info};

use crate::record::{WeatherRecord, WeatherTable};

pub const DEFAULT_MONTH: Month = Month::December;
pub const WINDOW_RADIUS: usize = 3;
/// Fewest known points a cubic spline can go through.
pub const CUBIC_MIN_POINTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    High,
    Low,
}

impl Column {
    fn get(self, record: &WeatherRecord) -> Option<f64> {
        match self {
            Column::High => record.high,
            Column::Low => record.low,
        }
    }

    fn set(self, record: &mut WeatherRecord, value: f64) {
        match self {
            Column::High => record.high = Some(value),
            Column::Low => record.low = Some(value),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::High => f.write_str("HIGH"),
            Column::Low => f.write_str("LOW"),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum FillError {
    #[error("No known {column} value around row {row}")]
    #[diagnostic(
        code(meteo::fill::insufficient_data),
        help("at least one of the 3 rows before or after a missing cell must hold a value")
    )]
    InsufficientData { column: Column, row: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Not-a-knot cubic spline through the known points of the window
    Cubic,
    /// Straight line between the closest known points on each side
    Linear,
    /// The hole is not surrounded by known points, copy the closest one
    Nearest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillSummary {
    pub months: usize,
    pub cubic: usize,
    pub linear: usize,
    pub nearest: usize,
}

impl FillSummary {
    pub fn temperatures(&self) -> usize {
        self.cubic + self.linear + self.nearest
    }

    fn count(&mut self, strategy: Strategy) {
        match strategy {
            Strategy::Cubic => self.cubic += 1,
            Strategy::Linear => self.linear += 1,
            Strategy::Nearest => self.nearest += 1,
        }
    }
}

impl AddAssign for FillSummary {
    fn add_assign(&mut self, other: Self) {
        self.months += other.months;
        self.cubic += other.cubic;
        self.linear += other.linear;
        self.nearest += other.nearest;
    }
}

/// Replace every missing month with [`DEFAULT_MONTH`]. Known months are never touched.
pub fn fill_months(table: &mut WeatherTable) -> usize {
    let mut filled = 0;
    for record in table.records.iter_mut().filter(|record| record.month.is_none()) {
        record.month = Some(DEFAULT_MONTH);
        filled += 1;
    }
    filled
}

pub fn fill_column(table: &mut WeatherTable, column: Column) -> Result<FillSummary, FillError> {
    let mut summary = FillSummary::default();
    let len = table.len();

    for row in 0..len {
        if column.get(&table.records[row]).is_some() {
            continue;
        }

        let start = row.saturating_sub(WINDOW_RADIUS);
        let end = (row + WINDOW_RADIUS + 1).min(len);
        let known: Vec<(f64, f64)> = (start..end)
            .filter_map(|i| column.get(&table.records[i]).map(|value| (i as f64, value)))
            .collect();

        let (value, strategy) = interpolate(&known, row as f64)
            .ok_or(FillError::InsufficientData { column, row })?;
        debug!(%column, row, value, ?strategy, "filled missing value");

        column.set(&mut table.records[row], value);
        summary.count(strategy);
    }

    Ok(summary)
}

/// Fill months, then HIGH, then LOW.
pub fn fill_missing(table: &mut WeatherTable) -> Result<FillSummary, FillError> {
    let mut summary = FillSummary {
        months: fill_months(table),
        ..FillSummary::default()
    };
    summary += fill_column(table, Column::High)?;
    summary += fill_column(table, Column::Low)?;

    info!(
        months = summary.months,
        temperatures = summary.temperatures(),
        cubic = summary.cubic,
        linear = summary.linear,
        nearest = summary.nearest,
        "filled missing values"
    );
    Ok(summary)
}

/// Estimate the value at `x` from `points`, sorted by their first coordinate.
fn interpolate(points: &[(f64, f64)], x: f64) -> Option<(f64, Strategy)> {
    let first = points.first()?;
    let last = points.last()?;
    let surrounded = first.0 < x && x < last.0;

    if surrounded && points.len() >= CUBIC_MIN_POINTS {
        if let Some(value) = CubicSpline::not_a_knot(points).map(|spline| spline.eval(x)) {
            return Some((value, Strategy::Cubic));
        }
    }

    if surrounded {
        let right = points.iter().position(|(px, _)| *px > x)?;
        let (x0, y0) = points[right - 1];
        let (x1, y1) = points[right];
        return Some((y0 + (y1 - y0) * (x - x0) / (x1 - x0), Strategy::Linear));
    }

    points
        .iter()
        .min_by(|left, right| (left.0 - x).abs().total_cmp(&(right.0 - x).abs()))
        .map(|(_, y)| (*y, Strategy::Nearest))
}

struct CubicSpline<'a> {
    points: &'a [(f64, f64)],
    // Second derivative at every knot
    moments: Vec<f64>,
}

impl<'a> CubicSpline<'a> {
    /// Spline whose third derivative is continuous at the second and the
    /// second to last knots. Through four points this is the interpolating cubic.
    fn not_a_knot(points: &'a [(f64, f64)]) -> Option<Self> {
        let n = points.len();
        if n < CUBIC_MIN_POINTS {
            return None;
        }

        let h: Vec<f64> = points.windows(2).map(|w| w[1].0 - w[0].0).collect();
        let mut system = vec![vec![0.0; n + 1]; n];

        system[0][0] = h[1];
        system[0][1] = -(h[0] + h[1]);
        system[0][2] = h[0];

        for k in 1..n - 1 {
            system[k][k - 1] = h[k - 1];
            system[k][k] = 2.0 * (h[k - 1] + h[k]);
            system[k][k + 1] = h[k];
            system[k][n] = 6.0
                * ((points[k + 1].1 - points[k].1) / h[k]
                    - (points[k].1 - points[k - 1].1) / h[k - 1]);
        }

        let last = n - 1;
        system[last][n - 3] = h[n - 2];
        system[last][n - 2] = -(h[n - 3] + h[n - 2]);
        system[last][n - 1] = h[n - 3];

        let moments = solve(system)?;
        Some(Self { points, moments })
    }

    fn eval(&self, x: f64) -> f64 {
        let k = self
            .points
            .windows(2)
            .position(|w| x <= w[1].0)
            .unwrap_or(self.points.len() - 2);
        let (x0, y0) = self.points[k];
        let (x1, y1) = self.points[k + 1];
        let (m0, m1) = (self.moments[k], self.moments[k + 1]);
        let h = x1 - x0;

        m0 * (x1 - x).powi(3) / (6.0 * h)
            + m1 * (x - x0).powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * (x1 - x)
            + (y1 / h - m1 * h / 6.0) * (x - x0)
    }
}

/// Gaussian elimination with partial pivoting on an augmented `n x (n + 1)` matrix.
fn solve(mut system: Vec<Vec<f64>>) -> Option<Vec<f64>> {
    let n = system.len();

    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| system[a][col].abs().total_cmp(&system[b][col].abs()))?;
        if system[pivot][col].abs() < 1e-12 {
            return None;
        }
        system.swap(col, pivot);

        for row in col + 1..n {
            let factor = system[row][col] / system[col][col];
            for k in col..=n {
                system[row][k] -= factor * system[col][k];
            }
        }
    }

    let mut solution = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| system[row][k] * solution[k]).sum();
        solution[row] = (system[row][n] - tail) / system[row][row];
    }
    Some(solution)
}
