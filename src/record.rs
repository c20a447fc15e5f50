use logos::Logos;
use time::Month;

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t]+")] // Ignore this regex pattern between tokens
enum MonthToken {
    #[token("JAN")]
    January,
    #[regex("FE(B|V)", priority = 3)]
    February,
    #[token("MAR")]
    March,
    #[token("APR")]
    April,
    #[token("MAY")]
    May,
    #[regex("J(UN|OU)", priority = 3)]
    June,
    #[token("JUL")]
    July,
    #[token("AUG")]
    August,
    #[token("SEP")]
    September,
    #[token("OCT")]
    October,
    #[token("NOV")]
    November,
    #[token("DEC")]
    December,
}

impl From<MonthToken> for Month {
    fn from(token: MonthToken) -> Self {
        match token {
            MonthToken::January => Month::January,
            MonthToken::February => Month::February,
            MonthToken::March => Month::March,
            MonthToken::April => Month::April,
            MonthToken::May => Month::May,
            MonthToken::June => Month::June,
            MonthToken::July => Month::July,
            MonthToken::August => Month::August,
            MonthToken::September => Month::September,
            MonthToken::October => Month::October,
            MonthToken::November => Month::November,
            MonthToken::December => Month::December,
        }
    }
}

/// Parse a three letter month code such as `DEC`.
///
/// The whole cell must be a single code, `DECEMBER` or `DEC 1` are rejected.
pub fn parse_month(code: &str) -> Option<Month> {
    let mut lexer = MonthToken::lexer(code);
    let month = match lexer.next() {
        Some(Ok(token)) => Month::from(token),
        _ => return None,
    };
    match lexer.next() {
        None => Some(month),
        Some(_) => None,
    }
}

/// The canonical code of a month, as written in the input files.
pub fn month_code(month: Month) -> &'static str {
    match month {
        Month::January => "JAN",
        Month::February => "FEB",
        Month::March => "MAR",
        Month::April => "APR",
        Month::May => "MAY",
        Month::June => "JUN",
        Month::July => "JUL",
        Month::August => "AUG",
        Month::September => "SEP",
        Month::October => "OCT",
        Month::November => "NOV",
        Month::December => "DEC",
    }
}

/// One day of observations. Row position in the table gives its place in the year.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub month: Option<Month>,

    pub high: Option<f64>,
    pub low: Option<f64>,
    /// Average temperature of the day
    pub temp: f64,

    pub direction: Option<String>,
    /// Bucketed high wind speed label
    pub wind_high: Option<String>,
    pub wind_speed: Option<f64>,

    pub rain: Option<f64>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    // Rows are kept in file order, which is the chronological order
    pub records: Vec<WeatherRecord>,
}

impl WeatherTable {
    pub fn new(records: Vec<WeatherRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeatherRecord> {
        self.records.iter()
    }

    pub fn temps(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.temp).collect()
    }

    /// Records of a single month, in file order.
    pub fn in_month(&self, month: Month) -> impl Iterator<Item = &WeatherRecord> {
        self.records
            .iter()
            .filter(move |record| record.month == Some(month))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(month: Option<Month>, temp: f64) -> WeatherRecord {
        WeatherRecord {
            month,
            high: Some(temp + 4.0),
            low: Some(temp - 4.0),
            temp,
            direction: None,
            wind_high: None,
            wind_speed: None,
            rain: None,
            time: None,
        }
    }

    #[test]
    fn parse_every_month_code() {
        let mut month = Month::January;
        for _ in 0..12 {
            assert_eq!(parse_month(month_code(month)), Some(month));
            month = month.next();
        }
    }

    #[test]
    fn parse_alternative_spellings() {
        assert_eq!(parse_month("FEV"), Some(Month::February));
        assert_eq!(parse_month("JOU"), Some(Month::June));
        assert_eq!(parse_month("  DEC "), Some(Month::December));
    }

    #[test]
    fn reject_unknown_codes() {
        assert_eq!(parse_month(""), None);
        assert_eq!(parse_month("DECEMBER"), None);
        assert_eq!(parse_month("DEC DEC"), None);
        assert_eq!(parse_month("dec"), None);
        assert_eq!(parse_month("XYZ"), None);
    }

    #[test]
    fn filter_by_month_keeps_order() {
        let table = WeatherTable::new(vec![
            record(Some(Month::December), 1.0),
            record(Some(Month::January), 2.0),
            record(Some(Month::December), 3.0),
        ]);
        let temps: Vec<f64> = table
            .in_month(Month::December)
            .map(|record| record.temp)
            .collect();
        assert_eq!(temps, vec![1.0, 3.0]);
    }
}
