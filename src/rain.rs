use std::{collections::BTreeMap, fmt};

use time::Month;

use crate::record::WeatherTable;

/// Below this yearly total, in mm, the year lacked rain.
pub const SATISFACTORY_RAIN: f64 = 400.0;
/// From this yearly total on, in mm, rainfall was excessive.
pub const EXCESSIVE_RAIN: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainStatus {
    Lack,
    Satisfactory,
    Excessive,
}

impl RainStatus {
    pub fn classify(total: f64) -> Self {
        if total < SATISFACTORY_RAIN {
            RainStatus::Lack
        } else if total < EXCESSIVE_RAIN {
            RainStatus::Satisfactory
        } else {
            RainStatus::Excessive
        }
    }
}

impl fmt::Display for RainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RainStatus::Lack => f.write_str("Lack of rain"),
            RainStatus::Satisfactory => f.write_str("Satisfactory amount of rain"),
            RainStatus::Excessive => f.write_str("Excessive rainfall"),
        }
    }
}

pub fn total_rainfall(table: &WeatherTable) -> f64 {
    table.iter().filter_map(|record| record.rain).sum()
}

/// Rain fallen in every month present in the table, January first.
pub fn monthly_rainfall(table: &WeatherTable) -> Vec<(Month, f64)> {
    let mut totals: BTreeMap<u8, (Month, f64)> = BTreeMap::new();
    for record in table.iter() {
        if let Some(month) = record.month {
            let (_, total) = totals.entry(month as u8).or_insert((month, 0.0));
            *total += record.rain.unwrap_or(0.0);
        }
    }
    totals.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{tests::record, WeatherRecord};

    #[test]
    fn classify_on_the_boundaries() {
        assert_eq!(RainStatus::classify(399.99), RainStatus::Lack);
        assert_eq!(RainStatus::classify(400.0), RainStatus::Satisfactory);
        assert_eq!(RainStatus::classify(599.99), RainStatus::Satisfactory);
        assert_eq!(RainStatus::classify(600.0), RainStatus::Excessive);
        assert_eq!(RainStatus::classify(0.0), RainStatus::Lack);
    }

    #[test]
    fn status_messages() {
        assert_eq!(RainStatus::Lack.to_string(), "Lack of rain");
        assert_eq!(
            RainStatus::Satisfactory.to_string(),
            "Satisfactory amount of rain"
        );
        assert_eq!(RainStatus::Excessive.to_string(), "Excessive rainfall");
    }

    fn rainy(month: Month, rain: Option<f64>) -> WeatherRecord {
        WeatherRecord {
            rain,
            ..record(Some(month), 10.0)
        }
    }

    #[test]
    fn totals_skip_missing_cells() {
        let table = WeatherTable::new(vec![
            rainy(Month::March, Some(2.5)),
            rainy(Month::March, None),
            rainy(Month::April, Some(7.5)),
        ]);
        assert_eq!(total_rainfall(&table), 10.0);
    }

    #[test]
    fn monthly_totals_in_calendar_order() {
        let table = WeatherTable::new(vec![
            rainy(Month::December, Some(1.0)),
            rainy(Month::January, Some(3.0)),
            rainy(Month::January, Some(4.0)),
            rainy(Month::August, None),
            rainy(Month::December, Some(2.0)),
        ]);

        assert_eq!(
            monthly_rainfall(&table),
            vec![
                (Month::January, 7.0),
                (Month::August, 0.0),
                (Month::December, 3.0)
            ]
        );
    }
}
