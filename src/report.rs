use std::fmt;

use time::Month;
use tracing::info;

use crate::{
    charts,
    config::Config,
    fill::{fill_missing, FillSummary},
    loader::load_path,
    rain::{monthly_rainfall, total_rainfall, RainStatus},
    record::{month_code, WeatherTable},
    season::{seasonal_series, SeasonSeries},
    stats::{
        direction_counts, hottest_times, median, peak_wind_speed, population_std_dev, std_dev,
        top_direction, DirectionCount, GroupMax,
    },
    trend::{december_trend, LinearTrend},
    Error,
};

/// How many of the highest temperatures are reported.
pub const HOTTEST_COUNT: usize = 4;

/// Everything computed from one year of observations.
#[derive(Debug, Clone)]
pub struct Report {
    pub temp_median: Option<f64>,
    pub temp_std: Option<f64>,
    pub temp_population_std: Option<f64>,

    /// Most frequent first
    pub directions: Vec<DirectionCount>,
    pub hottest: Vec<GroupMax<f64, Option<String>>>,
    pub peak_wind: Option<GroupMax<String, Option<f64>>>,

    pub trend: LinearTrend,
    pub forecast_day: f64,
    pub forecast: f64,

    pub rain_total: f64,
    pub rain_status: RainStatus,
    pub monthly_rain: Vec<(Month, f64)>,

    pub seasons: Vec<SeasonSeries>,
}

impl Report {
    /// Compute the report of an already filled table.
    pub fn compute(table: &WeatherTable, forecast_day: f64) -> Result<Self, Error> {
        let temps = table.temps();
        let trend = december_trend(table)?;
        let rain_total = total_rainfall(table);

        Ok(Self {
            temp_median: median(&temps),
            temp_std: std_dev(&temps),
            temp_population_std: population_std_dev(&temps),
            directions: direction_counts(table),
            hottest: hottest_times(table, HOTTEST_COUNT),
            peak_wind: peak_wind_speed(table),
            trend,
            forecast_day,
            forecast: trend.forecast(forecast_day),
            rain_total,
            rain_status: RainStatus::classify(rain_total),
            monthly_rain: monthly_rainfall(table),
            seasons: seasonal_series(table),
        })
    }

    pub fn top_direction(&self) -> Option<&DirectionCount> {
        top_direction(&self.directions)
    }
}

struct Value<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "> The median of average temperature is: {}",
            Value(self.temp_median)
        )?;
        writeln!(
            f,
            "> The std of average temperature is: {}",
            Value(self.temp_std)
        )?;

        writeln!(f, "> The {} of the highest temperature are: ", self.hottest.len())?;
        writeln!(f, "HIGH\tTIME")?;
        for group in &self.hottest {
            writeln!(f, "{}\t{}", group.key, Value(group.max.as_deref()))?;
        }

        match self.top_direction() {
            Some(top) => writeln!(
                f,
                "> Most times the wind was: {} ({} days)",
                top.direction, top.count
            )?,
            None => writeln!(f, "> Most times the wind was: n/a")?,
        }
        match &self.peak_wind {
            Some(peak) => writeln!(
                f,
                "> Max wind speed caused: {}\t{}",
                peak.key,
                Value(peak.max)
            )?,
            None => writeln!(f, "> Max wind speed caused: n/a")?,
        }

        writeln!(
            f,
            "> The avg temperature predicted for {} {} is: {} celsius",
            self.forecast_day,
            month_code(Month::December),
            self.forecast
        )?;

        writeln!(f, "> Rain status: ")?;
        write!(f, "{}", self.rain_status)
    }
}

/// Load, clean and analyse the configured file, print the report and, if
/// asked to, save the charts.
pub fn run(config: &Config) -> Result<Report, Error> {
    let mut table = load_path(&config.input)?;
    let summary: FillSummary = fill_missing(&mut table)?;
    info!(?summary, "cleaned weather data");

    let report = Report::compute(&table, config.forecast_day)?;
    println!("{report}");

    if config.with_plots {
        let written = charts::render_all(&config.plots_dir, &report)?;
        info!(charts = written.len(), dir = %config.plots_dir.display(), "saved charts");
    }

    Ok(report)
}
