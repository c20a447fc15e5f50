use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "data/weather_data.csv";
pub const DEFAULT_PLOTS_DIR: &str = "plots";
/// 25 December, counted like the days of the fitted December.
pub const DEFAULT_FORECAST_DAY: f64 = 25.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub plots_dir: PathBuf,
    /// Render the charts, otherwise only print the report
    pub with_plots: bool,
    pub forecast_day: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            plots_dir: PathBuf::from(DEFAULT_PLOTS_DIR),
            with_plots: false,
            forecast_day: DEFAULT_FORECAST_DAY,
        }
    }
}
