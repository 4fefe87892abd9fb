use chrono::NaiveDate;
use scan_report_lib::{frequency::FrequencyMap, series::{TimeSeries, OPEN_PORTS_PLOT_POINTS}, summary::SummaryRecord};
use sqlx::{postgres::PgPoolOptions, query_as, types::Json, PgPool};

use crate::{config::DatabaseConfig, DataManagerError};

use super::{constants::*, metric::{FrequencyMetric, ScalarMetric}};

/// Read access to the `summary` table of the scan database.
///
/// Every method runs exactly one statement and reads its rows to the end. Connections come
/// from a pool and go back to it on every path, including failures.
#[derive(Clone)]
pub struct SummaryDatabase {
    pool: PgPool,
}

impl SummaryDatabase {
    /// Does not touch the network. Connections are opened on first use, so a database
    /// that is down at startup shows up as [`DataManagerError::Unavailable`] per request.
    pub fn connect(config: &DatabaseConfig) -> Self {
        let pool = PgPoolOptions::new()
            .acquire_timeout(config.connect_timeout)
            .connect_lazy_with(config.connect_options());

        tracing::info!("Scan database configured at {}:{}/{}", config.host, config.port, config.database);

        Self { pool }
    }

    pub async fn get_country_codes(&self) -> Result<Vec<String>, DataManagerError> {
        query_as::<_, (String,)>(COUNTRY_CODES_QUERY)
            .fetch_all(&self.pool).await
            .map_err(|err| statement_error(COUNTRY, "*", err))
            .map(|rows| rows.into_iter().map(|row| row.0).collect())
    }

    pub async fn get_scalar(&self, country_code: &str, metric: ScalarMetric) -> Result<i64, DataManagerError> {
        query_as::<_, (Option<i64>,)>(metric.query())
            .bind(country_code)
            .fetch_optional(&self.pool).await
            .map_err(|err| statement_error(metric.column(), country_code, err))?
            .and_then(|row| row.0)
            .ok_or_else(|| DataManagerError::NotFound(metric.column(), country_code.to_string()))
    }

    pub async fn get_frequency(&self, country_code: &str, metric: FrequencyMetric) -> Result<FrequencyMap, DataManagerError> {
        query_as::<_, (Option<Json<FrequencyMap>>,)>(metric.query())
            .bind(country_code)
            .fetch_optional(&self.pool).await
            .map_err(|err| statement_error(metric.column(), country_code, err))?
            .and_then(|row| row.0)
            .map(|json| json.0)
            .ok_or_else(|| DataManagerError::NotFound(metric.column(), country_code.to_string()))
    }

    pub async fn get_total_open_ports_plot(&self, country_code: &str) -> Result<TimeSeries, DataManagerError> {
        query_as::<_, (NaiveDate, i64)>(OPEN_PORTS_PLOT_QUERY)
            .bind(country_code)
            .bind(OPEN_PORTS_PLOT_POINTS as i64)
            .fetch_all(&self.pool).await
            .map_err(|err| statement_error(TOTAL_PORTS_OPEN, country_code, err))
            .map(TimeSeries::from_points)
    }

    pub async fn get_summary(&self, country_code: &str) -> Result<SummaryRecord, DataManagerError> {
        query_as::<_, SummaryRecord>(SUMMARY_QUERY)
            .bind(country_code)
            .fetch_optional(&self.pool).await
            .map_err(|err| statement_error(SUMMARY_TABLE_NAME, country_code, err))?
            .ok_or_else(|| DataManagerError::NotFound(SUMMARY_TABLE_NAME, country_code.to_string()))
    }

    pub async fn get_ips_count(&self, country_code: &str) -> Result<i64, DataManagerError> {
        self.get_scalar(country_code, ScalarMetric::IpsScanned).await
    }

    pub async fn get_total_alive_hosts(&self, country_code: &str) -> Result<i64, DataManagerError> {
        self.get_scalar(country_code, ScalarMetric::IpsActive).await
    }

    pub async fn get_port_amount(&self, country_code: &str) -> Result<i64, DataManagerError> {
        self.get_scalar(country_code, ScalarMetric::PortsScanned).await
    }

    pub async fn get_total_open_ports(&self, country_code: &str) -> Result<i64, DataManagerError> {
        self.get_scalar(country_code, ScalarMetric::PortsOpen).await
    }

    pub async fn get_unique_open_ports(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.get_frequency(country_code, FrequencyMetric::OpenPorts).await
    }

    pub async fn get_products_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.get_frequency(country_code, FrequencyMetric::Products).await
    }

    pub async fn get_services_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.get_frequency(country_code, FrequencyMetric::Services).await
    }

    pub async fn get_versions_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.get_frequency(country_code, FrequencyMetric::Versions).await
    }

    pub async fn get_os_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.get_frequency(country_code, FrequencyMetric::Os).await
    }

    pub async fn get_cpe_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.get_frequency(country_code, FrequencyMetric::Cpe).await
    }
}

fn statement_error(what: &'static str, country_code: &str, err: sqlx::Error) -> DataManagerError {
    match err {
        sqlx::Error::RowNotFound => DataManagerError::NotFound(what, country_code.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            tracing::warn!("Could not decode {} for {}: {}", what, country_code, err);
            DataManagerError::Malformed(what, country_code.to_string(), err.to_string())
        },
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            tracing::error!("Could not connect to scan database: {}", err);
            DataManagerError::Unavailable(err.to_string())
        },
        err => {
            tracing::error!("Query for {} of {} failed: {}", what, country_code, err);
            DataManagerError::Unavailable(err.to_string())
        },
    }
}

#[tokio::test]
async fn unreachable_database_is_unavailable() {
    let config = DatabaseConfig {
        host: "127.0.0.1".into(),
        port: 1,
        database: "scandb".into(),
        username: "nobody".into(),
        password: "nothing".into(),
        connect_timeout: std::time::Duration::from_millis(300),
    };
    let db = SummaryDatabase::connect(&config);

    assert!(db.get_country_codes().await.unwrap_err().is_unavailable());
    assert!(db.get_ips_count("IS").await.unwrap_err().is_unavailable());
    assert!(db.get_total_open_ports_plot("IS").await.unwrap_err().is_unavailable());
}
