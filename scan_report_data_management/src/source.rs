use std::future::Future;

use scan_report_lib::{frequency::FrequencyMap, series::TimeSeries, summary::SummaryRecord};

use crate::{database::{db::SummaryDatabase, metric::{FrequencyMetric, ScalarMetric}}, DataManagerError};

/// Where the query logic gets its raw summary data from.
///
/// Implementations look codes up exactly as given; normalizing and validating them is
/// the [`DataManager`](crate::DataManager)'s job.
pub trait SummarySource: Send + Sync {
    fn country_codes(&self) -> impl Future<Output = Result<Vec<String>, DataManagerError>> + Send;

    fn scalar(&self, country_code: &str, metric: ScalarMetric) -> impl Future<Output = Result<i64, DataManagerError>> + Send;

    fn frequency(&self, country_code: &str, metric: FrequencyMetric) -> impl Future<Output = Result<FrequencyMap, DataManagerError>> + Send;

    fn open_ports_plot(&self, country_code: &str) -> impl Future<Output = Result<TimeSeries, DataManagerError>> + Send;

    fn summary(&self, country_code: &str) -> impl Future<Output = Result<SummaryRecord, DataManagerError>> + Send;
}

impl SummarySource for SummaryDatabase {
    async fn country_codes(&self) -> Result<Vec<String>, DataManagerError> {
        self.get_country_codes().await
    }

    async fn scalar(&self, country_code: &str, metric: ScalarMetric) -> Result<i64, DataManagerError> {
        self.get_scalar(country_code, metric).await
    }

    async fn frequency(&self, country_code: &str, metric: FrequencyMetric) -> Result<FrequencyMap, DataManagerError> {
        self.get_frequency(country_code, metric).await
    }

    async fn open_ports_plot(&self, country_code: &str) -> Result<TimeSeries, DataManagerError> {
        self.get_total_open_ports_plot(country_code).await
    }

    async fn summary(&self, country_code: &str) -> Result<SummaryRecord, DataManagerError> {
        self.get_summary(country_code).await
    }
}
