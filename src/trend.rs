use miette::Diagnostic;
use thiserror::Error;
use time::Month;

use crate::record::WeatherTable;

#[derive(Debug, Error, Diagnostic)]
pub enum TrendError {
    #[error("Cannot fit a trend without any observation")]
    #[diagnostic(
        code(meteo::trend::insufficient_data),
        help("the table needs at least one day of the fitted month")
    )]
    InsufficientData,
}

/// `temp = slope * day + intercept`, with days counted from 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    /// Least squares fit of `values` against their 1-based position.
    pub fn fit(values: &[f64]) -> Result<Self, TrendError> {
        match values {
            [] => Err(TrendError::InsufficientData),
            // A single point does not determine a line. Among every exact fit
            // this is the one with the smallest coefficients.
            [value] => Ok(Self {
                slope: value / 2.0,
                intercept: value / 2.0,
            }),
            _ => {
                let n = values.len() as f64;
                let mean_day = (n + 1.0) / 2.0;
                let mean_value = values.iter().sum::<f64>() / n;

                let (covariance, variance) = values.iter().enumerate().fold(
                    (0.0, 0.0),
                    |(covariance, variance), (i, value)| {
                        let dx = (i + 1) as f64 - mean_day;
                        (covariance + dx * (value - mean_value), variance + dx * dx)
                    },
                );

                let slope = covariance / variance;
                Ok(Self {
                    slope,
                    intercept: mean_value - slope * mean_day,
                })
            }
        }
    }

    pub fn forecast(&self, day: f64) -> f64 {
        self.slope * day + self.intercept
    }
}

pub fn month_temps(table: &WeatherTable, month: Month) -> Vec<f64> {
    table.in_month(month).map(|record| record.temp).collect()
}

/// Trend of the average temperature over the days of December.
pub fn december_trend(table: &WeatherTable) -> Result<LinearTrend, TrendError> {
    LinearTrend::fit(&month_temps(table, Month::December))
}
