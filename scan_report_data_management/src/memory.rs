use std::{collections::BTreeSet, path::Path};

use scan_report_lib::{frequency::FrequencyMap, series::{TimeSeries, OPEN_PORTS_PLOT_POINTS}, summary::SummaryRecord};

use crate::{database::{constants::*, metric::{FrequencyMetric, ScalarMetric}}, source::SummarySource, DataManagerError};

/// Summary rows held in memory, answering the same questions as the database.
///
/// Used for offline runs from a JSON fixture and in tests.
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: Vec<SummaryRecord>,
    available: bool,
}

impl MemorySource {
    pub fn new(records: Vec<SummaryRecord>) -> Self {
        Self {
            records,
            available: true,
        }
    }

    /// A source that fails every call as if the database were down.
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            available: false,
        }
    }

    /// Expects a JSON array of summary records.
    pub fn from_json(json: &str) -> Result<Self, DataManagerError> {
        let records: Vec<SummaryRecord> = serde_json::from_str(json)
            .map_err(|err| DataManagerError::Config(format!("Invalid summary fixture: {err}")))?;
        Ok(Self::new(records))
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DataManagerError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await
            .map_err(|err| DataManagerError::Config(format!("Failed to read summary fixture {:?}: {}", path, err)))?;
        let source = Self::from_json(&json)?;
        tracing::info!("Loaded {} summary records from {:?}", source.records.len(), path);
        Ok(source)
    }

    fn check_available(&self) -> Result<(), DataManagerError> {
        if self.available {
            Ok(())
        } else {
            Err(DataManagerError::Unavailable("in-memory source is marked unavailable".into()))
        }
    }

    fn latest(&self, country_code: &str, what: &'static str) -> Result<&SummaryRecord, DataManagerError> {
        self.check_available()?;
        self.records.iter()
            .filter(|record| record.country == country_code)
            .max_by_key(|record| record.port_scan_done_ts)
            .ok_or_else(|| DataManagerError::NotFound(what, country_code.to_string()))
    }
}

impl SummarySource for MemorySource {
    async fn country_codes(&self) -> Result<Vec<String>, DataManagerError> {
        self.check_available()?;
        let codes: BTreeSet<&String> = self.records.iter().map(|record| &record.country).collect();
        Ok(codes.into_iter().cloned().collect())
    }

    async fn scalar(&self, country_code: &str, metric: ScalarMetric) -> Result<i64, DataManagerError> {
        metric.select(self.latest(country_code, metric.column())?)
            .ok_or_else(|| DataManagerError::NotFound(metric.column(), country_code.to_string()))
    }

    async fn frequency(&self, country_code: &str, metric: FrequencyMetric) -> Result<FrequencyMap, DataManagerError> {
        Ok(metric.select(self.latest(country_code, metric.column())?).clone())
    }

    async fn open_ports_plot(&self, country_code: &str) -> Result<TimeSeries, DataManagerError> {
        self.check_available()?;

        let mut points: Vec<_> = self.records.iter()
            .filter(|record| record.country == country_code)
            .filter_map(|record| Some((record.port_scan_done_ts?, record.total_ports_open?)))
            .collect();

        points.sort_by(|a, b| b.0.cmp(&a.0));
        points.truncate(OPEN_PORTS_PLOT_POINTS);

        Ok(TimeSeries::from_points(points.into_iter().map(|(ts, open)| (ts.date_naive(), open)).collect()))
    }

    async fn summary(&self, country_code: &str) -> Result<SummaryRecord, DataManagerError> {
        self.latest(country_code, SUMMARY_TABLE_NAME).cloned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn scan(country: &str, day: u32, open: Option<i64>) -> SummaryRecord {
        let mut record = SummaryRecord::new(country);
        record.total_ports_open = open;
        record.port_scan_done_ts = Some(Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap());
        record
    }

    #[tokio::test]
    async fn country_codes_are_distinct_and_sorted() {
        let source = MemorySource::new(vec![scan("NO", 1, None), scan("IS", 1, None), scan("NO", 2, None)]);

        assert_eq!(source.country_codes().await.unwrap(), vec!["IS", "NO"]);
    }

    #[tokio::test]
    async fn scalars_come_from_latest_scan() {
        let source = MemorySource::new(vec![scan("IS", 1, Some(10)), scan("IS", 9, Some(90)), scan("IS", 5, Some(50))]);

        assert_eq!(source.scalar("IS", ScalarMetric::PortsOpen).await.unwrap(), 90);
    }

    #[tokio::test]
    async fn missing_country_or_column_is_not_found() {
        let source = MemorySource::new(vec![scan("IS", 1, None)]);

        assert!(matches!(source.scalar("IS", ScalarMetric::PortsOpen).await, Err(DataManagerError::NotFound(..))));
        assert!(matches!(source.frequency("DK", FrequencyMetric::Os).await, Err(DataManagerError::NotFound(..))));
    }

    #[tokio::test]
    async fn plot_keeps_ten_newest_scans_ascending() {
        let records = (1..=14).map(|day| scan("IS", day, Some(day as i64))).chain([scan("IS", 20, None)]).collect();
        let series = MemorySource::new(records).open_ports_plot("IS").await.unwrap();

        assert_eq!(series.len(), OPEN_PORTS_PLOT_POINTS);
        assert_eq!(series.values, (5..=14).collect::<Vec<i64>>());
        assert_eq!(series.labels[0], "05-03-2025");
    }

    #[tokio::test]
    async fn unavailable_source_fails_everything() {
        let source = MemorySource::unavailable();

        assert!(source.country_codes().await.unwrap_err().is_unavailable());
        assert!(source.open_ports_plot("IS").await.unwrap_err().is_unavailable());
        assert!(source.summary("IS").await.unwrap_err().is_unavailable());
    }

    #[test]
    fn invalid_fixture_is_rejected() {
        assert!(matches!(MemorySource::from_json(r#"{"country": "IS"}"#), Err(DataManagerError::Config(_))));
    }
}
