use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::{postgres::PgRow, prelude::*, types::Json};

use crate::frequency::FrequencyMap;

/// Aggregated scan statistics for one country at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub country: String,
    #[serde(default)]
    pub total_ips_scanned: Option<i64>,
    #[serde(default)]
    pub total_ips_active: Option<i64>,
    #[serde(default)]
    pub total_ports_scanned: Option<i64>,
    #[serde(default)]
    pub total_ports_open: Option<i64>,
    #[serde(default)]
    pub open_ports_count: FrequencyMap,
    #[serde(default)]
    pub products_count: FrequencyMap,
    #[serde(default)]
    pub services_count: FrequencyMap,
    #[serde(default)]
    pub versions_count: FrequencyMap,
    #[serde(default)]
    pub os_count: FrequencyMap,
    #[serde(default)]
    pub cpe_count: FrequencyMap,
    #[serde(default)]
    pub port_scan_done_ts: Option<DateTime<Utc>>,
}

impl SummaryRecord {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ..Default::default()
        }
    }
}

#[cfg(feature = "sqlx")]
fn frequency_column(row: &PgRow, column: &str) -> sqlx::Result<FrequencyMap> {
    let value: Option<Json<FrequencyMap>> = row.try_get(column)?;
    Ok(value.map(|json| json.0).unwrap_or_default())
}

#[cfg(feature = "sqlx")]
impl FromRow<'_, PgRow> for SummaryRecord {
    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            country: row.try_get("country")?,
            total_ips_scanned: row.try_get("total_ips_scanned")?,
            total_ips_active: row.try_get("total_ips_active")?,
            total_ports_scanned: row.try_get("total_ports_scanned")?,
            total_ports_open: row.try_get("total_ports_open")?,
            open_ports_count: frequency_column(row, "open_ports_count")?,
            products_count: frequency_column(row, "products_count")?,
            services_count: frequency_column(row, "services_count")?,
            versions_count: frequency_column(row, "versions_count")?,
            os_count: frequency_column(row, "os_count")?,
            cpe_count: frequency_column(row, "cpe_count")?,
            port_scan_done_ts: row.try_get("port_scan_done_ts")?,
        })
    }
}

#[test]
fn fixture_record_fills_missing_columns_with_defaults() {
    let record: SummaryRecord = serde_json::from_str(r#"{
        "country": "IS",
        "total_ips_scanned": 1000,
        "open_ports_count": {"80": 12, "22": 30},
        "port_scan_done_ts": "2025-04-24T10:00:00Z"
    }"#).unwrap();

    assert_eq!(record.country, "IS");
    assert_eq!(record.total_ips_scanned, Some(1000));
    assert_eq!(record.total_ips_active, None);
    assert_eq!(record.open_ports_count.get("22"), Some(30));
    assert!(record.cpe_count.is_empty());
    assert!(record.port_scan_done_ts.is_some());
}
