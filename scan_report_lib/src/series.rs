use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How many of the most recent scans the open ports graph covers.
pub const OPEN_PORTS_PLOT_POINTS: usize = 10;

pub const DATE_LABEL_FORMAT: &str = "%d-%m-%Y";

pub fn format_date_label(date: NaiveDate) -> String {
    date.format(DATE_LABEL_FORMAT).to_string()
}

/// Date labels with one value per label, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl TimeSeries {
    /// Points may come in any order (the database hands them over newest first).
    pub fn from_points(mut points: Vec<(NaiveDate, i64)>) -> Self {
        points.sort_by_key(|(date, _)| *date);

        let (labels, values) = points.into_iter()
            .map(|(date, value)| (format_date_label(date), value))
            .unzip();

        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[test]
fn label_is_day_month_year() {
    let date = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
    assert_eq!(format_date_label(date), "07-04-2025");

    let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    assert_eq!(format_date_label(date), "31-12-1999");
}

#[test]
fn newest_first_points_come_out_ascending() {
    let points: Vec<(NaiveDate, i64)> = (0..OPEN_PORTS_PLOT_POINTS as u32)
        .rev()
        .map(|day| (NaiveDate::from_ymd_opt(2025, 5, day + 1).unwrap(), day as i64 * 10))
        .collect();

    let series = TimeSeries::from_points(points);

    assert_eq!(series.len(), OPEN_PORTS_PLOT_POINTS);
    assert_eq!(series.values.len(), series.labels.len());
    assert_eq!(series.labels.first().map(String::as_str), Some("01-05-2025"));
    assert_eq!(series.labels.last().map(String::as_str), Some("10-05-2025"));
    assert_eq!(series.values, (0..10).map(|v| v * 10).collect::<Vec<i64>>());
}

#[test]
fn same_day_points_keep_their_order() {
    let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let earlier = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    let series = TimeSeries::from_points(vec![(day, 5), (day, 3), (earlier, 9)]);

    assert_eq!(series.labels, vec!["01-01-2025", "02-01-2025", "02-01-2025"]);
    assert_eq!(series.values, vec![9, 5, 3]);
}

#[test]
fn no_points_gives_empty_series() {
    let series = TimeSeries::from_points(Vec::new());
    assert!(series.is_empty());
    assert!(series.values.is_empty());
}
