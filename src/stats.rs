use std::{
    cmp::Ordering,
    collections::{btree_map::Entry, BTreeMap, HashMap},
};

use ordered_float::OrderedFloat;

use crate::record::WeatherTable;

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|left, right| left.total_cmp(right));

    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[middle - 1] + sorted[middle]) / 2.0)
    } else {
        Some(sorted[middle])
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn squared_deviations(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    Some(values.iter().map(|value| (value - mean).powi(2)).sum())
}

/// Sample standard deviation (divides by `n - 1`).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some((squared_deviations(values)? / (values.len() - 1) as f64).sqrt())
}

pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    Some((squared_deviations(values)? / values.len() as f64).sqrt())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionCount {
    pub direction: String,
    pub count: usize,
}

/// How many days the wind blew from each direction, most frequent first.
///
/// Days without a direction are ignored. Directions with the same count keep
/// the order in which they first show up in the table.
pub fn direction_counts(table: &WeatherTable) -> Vec<DirectionCount> {
    let mut counts: Vec<DirectionCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for direction in table.iter().filter_map(|record| record.direction.as_deref()) {
        match positions.get(direction) {
            Some(&position) => counts[position].count += 1,
            None => {
                positions.insert(direction, counts.len());
                counts.push(DirectionCount {
                    direction: direction.to_string(),
                    count: 1,
                });
            }
        }
    }

    // `sort_by` is stable, ties stay in order of appearance
    counts.sort_by(|left, right| right.count.cmp(&left.count));
    counts
}

/// The most frequent direction of counts sorted by [`direction_counts`].
pub fn top_direction(counts: &[DirectionCount]) -> Option<&DirectionCount> {
    counts.first()
}

/// Share of every direction in percent, in the order of `counts`.
pub fn direction_percentages(counts: &[DirectionCount]) -> Vec<(String, f64)> {
    let total: usize = counts.iter().map(|count| count.count).sum();
    counts
        .iter()
        .map(|count| {
            (
                count.direction.clone(),
                count.count as f64 * 100.0 / total as f64,
            )
        })
        .collect()
}

/// Largest value of a column among the rows sharing the same key. `max` is
/// `None` when every row of the group misses the value.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMax<K, V> {
    pub key: K,
    pub max: V,
}

fn grouped_max<K: Ord, V: Ord>(pairs: impl Iterator<Item = (K, V)>) -> BTreeMap<K, V> {
    let mut groups = BTreeMap::new();
    for (key, value) in pairs {
        match groups.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => {
                if value > *entry.get() {
                    entry.insert(value);
                }
            }
        }
    }
    groups
}

/// Latest TIME of the `count` highest HIGH values, lowest of them first.
pub fn hottest_times(table: &WeatherTable, count: usize) -> Vec<GroupMax<f64, Option<String>>> {
    // `None` sorts below any time, so a missing TIME never hides a known one
    let groups = grouped_max(
        table
            .iter()
            .filter_map(|record| Some((OrderedFloat(record.high?), record.time.clone()))),
    );

    let skip = groups.len().saturating_sub(count);
    groups
        .into_iter()
        .skip(skip)
        .map(|(key, max)| GroupMax { key: key.0, max })
        .collect()
}

/// Wind speed bucket label. Labels that read as numbers are ordered by value
/// and come before the others, which are ordered alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WindLabel(String);

impl WindLabel {
    fn value(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl Ord for WindLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.value(), other.value()) {
            (Some(left), Some(right)) => left.total_cmp(&right).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for WindLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Highest W_SPEED of the highest WINDHIGH bucket.
pub fn peak_wind_speed(table: &WeatherTable) -> Option<GroupMax<String, Option<f64>>> {
    let groups = grouped_max(table.iter().filter_map(|record| {
        Some((
            WindLabel(record.wind_high.clone()?),
            record.wind_speed.map(OrderedFloat),
        ))
    }));

    groups.into_iter().next_back().map(|(key, max)| GroupMax {
        key: key.0,
        max: max.map(|speed| speed.0),
    })
}

#[cfg(test)]
mod tests {
    use time::Month;

    use super::*;
    use crate::record::{tests::record, WeatherRecord};

    fn assert_close(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "{left} != {right}");
    }

    fn table_with_directions(directions: &[&str]) -> WeatherTable {
        WeatherTable::new(
            directions
                .iter()
                .map(|direction| WeatherRecord {
                    direction: Some(direction.to_string()),
                    ..record(Some(Month::May), 15.0)
                })
                .collect(),
        )
    }

    #[test]
    fn median_of_odd_and_even_sets() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn standard_deviations() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_close(population_std_dev(&values).unwrap(), 2.0);
        assert_close(std_dev(&values).unwrap(), (32.0f64 / 7.0).sqrt());
        assert_eq!(std_dev(&[1.0]), None);
        assert_eq!(population_std_dev(&[]), None);
    }

    #[test]
    fn most_frequent_direction() {
        let table = table_with_directions(&["N", "N", "S", "N", "E"]);
        assert_eq!(
            top_direction(&direction_counts(&table)),
            Some(&DirectionCount {
                direction: String::from("N"),
                count: 3
            })
        );
    }

    #[test]
    fn ties_keep_order_of_appearance() {
        let table = table_with_directions(&["W", "E", "S", "E", "W", "N"]);
        let counts = direction_counts(&table);
        let counts: Vec<(&str, usize)> = counts
            .iter()
            .map(|count| (count.direction.as_str(), count.count))
            .collect();
        assert_eq!(counts, vec![("W", 2), ("E", 2), ("S", 1), ("N", 1)]);
    }

    #[test]
    fn missing_directions_are_not_counted() {
        let mut table = table_with_directions(&["N", "S"]);
        table.records.push(record(Some(Month::May), 15.0));

        let total: usize = direction_counts(&table).iter().map(|count| count.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn percentages_add_up() {
        let table = table_with_directions(&["N", "N", "S", "E"]);
        let percentages = direction_percentages(&direction_counts(&table));

        assert_eq!(percentages[0].0, "N");
        assert_close(percentages[0].1, 50.0);
        assert_close(percentages.iter().map(|(_, share)| share).sum(), 100.0);
    }

    #[test]
    fn latest_time_of_the_highest_temperatures() {
        let rows = [
            (30.0, "14:00"),
            (25.0, "13:00"),
            (31.5, "15:10"),
            (30.0, "16:40"),
            (28.0, "12:30"),
            (33.0, "14:50"),
            (20.0, "11:00"),
        ];
        let table = WeatherTable::new(
            rows.iter()
                .map(|(high, time)| WeatherRecord {
                    high: Some(*high),
                    time: Some(time.to_string()),
                    ..record(Some(Month::July), 25.0)
                })
                .collect(),
        );

        let hottest = hottest_times(&table, 4);
        let expected = [
            (28.0, "12:30"),
            (30.0, "16:40"),
            (31.5, "15:10"),
            (33.0, "14:50"),
        ];
        assert_eq!(hottest.len(), 4);
        for (group, (key, time)) in hottest.iter().zip(expected) {
            assert_eq!(group.key, key);
            assert_eq!(group.max.as_deref(), Some(time));
        }
    }

    #[test]
    fn fewer_groups_than_requested() {
        let table = WeatherTable::new(vec![WeatherRecord {
            time: Some(String::from("10:00")),
            ..record(Some(Month::July), 25.0)
        }]);
        assert_eq!(hottest_times(&table, 4).len(), 1);
    }

    #[test]
    fn peak_wind_speed_of_the_highest_bucket() {
        let rows = [("9", 20.0), ("12", 31.0), ("12", 35.5), ("10", 40.0)];
        let table = WeatherTable::new(
            rows.iter()
                .map(|(label, speed)| WeatherRecord {
                    wind_high: Some(label.to_string()),
                    wind_speed: Some(*speed),
                    ..record(Some(Month::October), 12.0)
                })
                .collect(),
        );

        // "12" sorts above "9" by value even though it sorts below it as text
        assert_eq!(
            peak_wind_speed(&table),
            Some(GroupMax {
                key: String::from("12"),
                max: Some(35.5)
            })
        );
    }

    #[test]
    fn text_buckets_sort_alphabetically() {
        let rows = [("gale", 60.0), ("breeze", 20.0), ("storm", 90.0), ("storm", 85.0)];
        let table = WeatherTable::new(
            rows.iter()
                .map(|(label, speed)| WeatherRecord {
                    wind_high: Some(label.to_string()),
                    wind_speed: Some(*speed),
                    ..record(Some(Month::October), 12.0)
                })
                .collect(),
        );

        let peak = peak_wind_speed(&table).unwrap();
        assert_eq!(peak.key, "storm");
        assert_eq!(peak.max, Some(90.0));
    }

    #[test]
    fn highest_temperature_without_time_is_kept() {
        let rows = [
            (40.0, None),
            (30.0, Some("12:00")),
            (31.0, Some("13:00")),
            (32.0, Some("14:00")),
            (33.0, Some("15:00")),
            (33.0, None),
        ];
        let table = WeatherTable::new(
            rows.iter()
                .map(|(high, time)| WeatherRecord {
                    high: Some(*high),
                    time: time.map(String::from),
                    ..record(Some(Month::July), 25.0)
                })
                .collect(),
        );

        let hottest = hottest_times(&table, 4);
        let keys: Vec<f64> = hottest.iter().map(|group| group.key).collect();
        assert_eq!(keys, vec![31.0, 32.0, 33.0, 40.0]);
        // A missing TIME does not win over a known one of the same group
        assert_eq!(hottest[2].max.as_deref(), Some("15:00"));
        assert_eq!(hottest[3].max, None);
    }

    #[test]
    fn highest_bucket_without_speed_is_kept() {
        let rows = [("10", Some(8.0)), ("30", None), ("20", Some(25.0))];
        let table = WeatherTable::new(
            rows.iter()
                .map(|(label, speed)| WeatherRecord {
                    wind_high: Some(label.to_string()),
                    wind_speed: *speed,
                    ..record(Some(Month::October), 12.0)
                })
                .collect(),
        );

        assert_eq!(
            peak_wind_speed(&table),
            Some(GroupMax {
                key: String::from("30"),
                max: None
            })
        );
    }

    #[test]
    fn no_wind_data() {
        let table = WeatherTable::new(vec![record(Some(Month::October), 12.0)]);
        assert_eq!(peak_wind_speed(&table), None);
    }
}
