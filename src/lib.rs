//! One year of daily weather observations: load them from a csv file, fill
//! the holes, describe the year and draw it.

use miette::Diagnostic;
use thiserror::Error;

pub mod charts;
pub mod config;
pub mod fill;
pub mod loader;
pub mod rain;
pub mod record;
pub mod report;
pub mod season;
pub mod stats;
pub mod trend;

pub use config::Config;
pub use record::{WeatherRecord, WeatherTable};
pub use report::{run, Report};

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] loader::LoadError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fill(#[from] fill::FillError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Trend(#[from] trend::TrendError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Chart(#[from] charts::ChartError),
}
