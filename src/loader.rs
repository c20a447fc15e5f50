use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use miette::Diagnostic;
use thiserror::Error;
use tracing::info;

use crate::record::{parse_month, WeatherRecord, WeatherTable};

/// Cell contents that mean "no observation".
const MISSING_MARKERS: [&str; 5] = ["", "NA", "N/A", "NaN", "nan"];

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("Could not open {path}")]
    #[diagnostic(code(meteo::load::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed csv: {0}")]
    #[diagnostic(code(meteo::load::csv))]
    Csv(#[from] csv::Error),
    #[error("Missing column `{0}` in header")]
    #[diagnostic(
        code(meteo::load::missing_column),
        help("the header must contain MONTH, HIGH, LOW, TEMP, DIR, WINDHIGH, W_SPEED, RAIN and TIME")
    )]
    MissingColumn(&'static str),
    #[error("Bad number in row {row}, column {column}: `{value}`")]
    #[diagnostic(code(meteo::load::invalid_number))]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("Unknown month `{value}` in row {row}")]
    #[diagnostic(
        code(meteo::load::unknown_month),
        help("months are written as three letter codes, JAN to DEC")
    )]
    UnknownMonth { row: usize, value: String },
    #[error("Missing value in row {row}, column {column}")]
    #[diagnostic(code(meteo::load::missing_value))]
    MissingValue { row: usize, column: &'static str },
}

/// Position of every required column inside the header.
struct Columns {
    month: usize,
    high: usize,
    low: usize,
    temp: usize,
    direction: usize,
    wind_high: usize,
    wind_speed: usize,
    rain: usize,
    time: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        Ok(Self {
            month: find("MONTH")?,
            high: find("HIGH")?,
            low: find("LOW")?,
            temp: find("TEMP")?,
            direction: find("DIR")?,
            wind_high: find("WINDHIGH")?,
            wind_speed: find("W_SPEED")?,
            rain: find("RAIN")?,
            time: find("TIME")?,
        })
    }
}

fn cell(record: &StringRecord, index: usize) -> Option<&str> {
    record
        .get(index)
        .filter(|value| !MISSING_MARKERS.contains(value))
}

fn number(
    record: &StringRecord,
    index: usize,
    row: usize,
    column: &'static str,
) -> Result<Option<f64>, LoadError> {
    match cell(record, index) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| LoadError::InvalidNumber {
                row,
                column,
                value: value.to_string(),
            }),
    }
}

fn parse_row(record: &StringRecord, columns: &Columns, row: usize) -> Result<WeatherRecord, LoadError> {
    let month = match cell(record, columns.month) {
        None => None,
        Some(value) => Some(parse_month(value).ok_or_else(|| LoadError::UnknownMonth {
            row,
            value: value.to_string(),
        })?),
    };

    let temp = number(record, columns.temp, row, "TEMP")?
        .ok_or(LoadError::MissingValue { row, column: "TEMP" })?;

    Ok(WeatherRecord {
        month,
        high: number(record, columns.high, row, "HIGH")?,
        low: number(record, columns.low, row, "LOW")?,
        temp,
        direction: cell(record, columns.direction).map(String::from),
        wind_high: cell(record, columns.wind_high).map(String::from),
        wind_speed: number(record, columns.wind_speed, row, "W_SPEED")?,
        rain: number(record, columns.rain, row, "RAIN")?,
        time: cell(record, columns.time).map(String::from),
    })
}

/// Read a table from any csv source. The first line must be the header.
///
/// Whitespace around every field is trimmed, and empty cells become missing values.
pub fn load_reader(reader: impl Read) -> Result<WeatherTable, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let columns = Columns::locate(reader.headers()?)?;

    let mut records = Vec::new();
    for (row, line) in reader.records().enumerate() {
        records.push(parse_row(&line?, &columns, row)?);
    }

    Ok(WeatherTable::new(records))
}

pub fn load_path(path: impl AsRef<Path>) -> Result<WeatherTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let table = load_reader(file)?;
    info!(path = %path.display(), rows = table.len(), "loaded weather data");
    Ok(table)
}
