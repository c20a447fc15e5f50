use std::fmt;

use time::Month;

use crate::record::WeatherTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// In the order of the seasonal chart panels.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub const fn months(self) -> [Month; 3] {
        match self {
            Season::Winter => [Month::December, Month::January, Month::February],
            Season::Spring => [Month::March, Month::April, Month::May],
            Season::Summer => [Month::June, Month::July, Month::August],
            Season::Fall => [Month::September, Month::October, Month::November],
        }
    }

    pub fn of(month: Month) -> Self {
        match month {
            Month::December | Month::January | Month::February => Season::Winter,
            Month::March | Month::April | Month::May => Season::Spring,
            Month::June | Month::July | Month::August => Season::Summer,
            Month::September | Month::October | Month::November => Season::Fall,
        }
    }

    pub fn contains(self, month: Month) -> bool {
        self.months().contains(&month)
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Temperatures of the days of one season, in file order.
///
/// The three series always have the same length. A HIGH or LOW cell that is
/// still missing shows up as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSeries {
    pub season: Season,
    pub high: Vec<f64>,
    pub temp: Vec<f64>,
    pub low: Vec<f64>,
}

impl SeasonSeries {
    pub fn len(&self) -> usize {
        self.temp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temp.is_empty()
    }
}

pub fn season_series(table: &WeatherTable, season: Season) -> SeasonSeries {
    let mut series = SeasonSeries {
        season,
        high: Vec::new(),
        temp: Vec::new(),
        low: Vec::new(),
    };

    for record in table
        .iter()
        .filter(|record| record.month.is_some_and(|month| season.contains(month)))
    {
        series.high.push(record.high.unwrap_or(f64::NAN));
        series.temp.push(record.temp);
        series.low.push(record.low.unwrap_or(f64::NAN));
    }

    series
}

pub fn seasonal_series(table: &WeatherTable) -> Vec<SeasonSeries> {
    Season::ALL
        .iter()
        .map(|season| season_series(table, *season))
        .collect()
}
