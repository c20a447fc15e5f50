use std::path::PathBuf;

use clap::Parser;
use meteo_year::{config, run, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "meteo-year")]
#[command(about = "Describe one year of daily weather observations", long_about = None)]
struct Cli {
    /// Csv file with the MONTH, HIGH, LOW, TEMP, DIR, WINDHIGH, W_SPEED, RAIN and TIME columns
    #[arg(long, env = "METEO_INPUT", default_value = config::DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory the charts are saved in
    #[arg(long, env = "METEO_PLOTS_DIR", default_value = config::DEFAULT_PLOTS_DIR)]
    plots_dir: PathBuf,

    /// Save the charts, otherwise only print the report
    #[arg(long, env = "METEO_WITH_PLOTS")]
    with_plots: bool,

    /// Day of December the average temperature is predicted for
    #[arg(long, default_value_t = config::DEFAULT_FORECAST_DAY)]
    forecast_day: f64,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            plots_dir: cli.plots_dir,
            with_plots: cli.with_plots,
            forecast_day: cli.forecast_day,
        }
    }
}

fn main() -> miette::Result<()> {
    // Logs go to stderr, stdout only carries the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from(Cli::parse());
    run(&config)?;
    Ok(())
}
