use scan_report_lib::{frequency::FrequencyMap, series::TimeSeries, summary::SummaryRecord};

use crate::{database::metric::{FrequencyMetric, ScalarMetric}, source::SummarySource, DataManagerError};

/// Outcome of checking a country code against the codes present in the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryVerification {
    Member,
    NonMember,
    /// The set of known codes could not be fetched.
    Indeterminate,
}

#[derive(Clone)]
pub struct DataManager<S> {
    source: S,
}

/// The public interface for all scan summary queries.
///
/// Every per-country query verifies the code first and runs against its uppercase form.
/// Frequency queries come back shaped: highest counts first, at most five entries.
/// Callers making several queries for one country can verify once with
/// [`DataManager::verified_country`] and query through the returned handle.
impl<S: SummarySource> DataManager<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn get_country_codes(&self) -> Result<Vec<String>, DataManagerError> {
        self.source.country_codes().await
    }

    pub async fn verify_country_code(&self, country_code: &str) -> CountryVerification {
        match self.source.country_codes().await {
            Ok(codes) => {
                let country_code = country_code.to_uppercase();
                if codes.iter().any(|code| *code == country_code) {
                    CountryVerification::Member
                } else {
                    CountryVerification::NonMember
                }
            },
            Err(err) => {
                tracing::warn!("Could not verify country code {}: {}", country_code, err);
                CountryVerification::Indeterminate
            },
        }
    }

    /// Non-members fail with [`DataManagerError::UnknownCountry`], unverifiable codes with
    /// [`DataManagerError::Unavailable`].
    pub async fn verified_country(&self, country_code: &str) -> Result<VerifiedCountry<'_, S>, DataManagerError> {
        match self.verify_country_code(country_code).await {
            CountryVerification::Member => Ok(VerifiedCountry {
                source: &self.source,
                code: country_code.to_uppercase(),
            }),
            CountryVerification::NonMember => Err(DataManagerError::UnknownCountry(country_code.to_string())),
            CountryVerification::Indeterminate => Err(DataManagerError::Unavailable(format!("could not verify country code {country_code}"))),
        }
    }

    pub async fn get_ips_count(&self, country_code: &str) -> Result<i64, DataManagerError> {
        self.verified_country(country_code).await?.get_ips_count().await
    }

    pub async fn get_total_alive_hosts(&self, country_code: &str) -> Result<i64, DataManagerError> {
        self.verified_country(country_code).await?.get_total_alive_hosts().await
    }

    pub async fn get_port_amount(&self, country_code: &str) -> Result<i64, DataManagerError> {
        self.verified_country(country_code).await?.get_port_amount().await
    }

    pub async fn get_total_open_ports(&self, country_code: &str) -> Result<i64, DataManagerError> {
        self.verified_country(country_code).await?.get_total_open_ports().await
    }

    pub async fn get_total_open_ports_plot(&self, country_code: &str) -> Result<TimeSeries, DataManagerError> {
        self.verified_country(country_code).await?.get_total_open_ports_plot().await
    }

    pub async fn get_unique_open_ports(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.verified_country(country_code).await?.get_unique_open_ports().await
    }

    pub async fn get_products_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.verified_country(country_code).await?.get_products_count().await
    }

    pub async fn get_services_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.verified_country(country_code).await?.get_services_count().await
    }

    pub async fn get_versions_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.verified_country(country_code).await?.get_versions_count().await
    }

    pub async fn get_os_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.verified_country(country_code).await?.get_os_count().await
    }

    pub async fn get_cpe_count(&self, country_code: &str) -> Result<FrequencyMap, DataManagerError> {
        self.verified_country(country_code).await?.get_cpe_count().await
    }

    /// The full latest record, frequency columns unshaped.
    pub async fn get_summary(&self, country_code: &str) -> Result<SummaryRecord, DataManagerError> {
        self.verified_country(country_code).await?.get_summary().await
    }
}

/// A country code that was found in the summary table, in uppercase.
///
/// Queries through it skip verification.
pub struct VerifiedCountry<'a, S> {
    source: &'a S,
    code: String,
}

impl<S: SummarySource> VerifiedCountry<'_, S> {
    pub fn code(&self) -> &str {
        &self.code
    }

    async fn shaped(&self, metric: FrequencyMetric) -> Result<FrequencyMap, DataManagerError> {
        match self.source.frequency(&self.code, metric).await {
            Ok(content) => Ok(content.shape()),
            Err(DataManagerError::NotFound(..)) => Ok(FrequencyMap::new()),
            Err(err) => Err(err),
        }
    }

    pub async fn get_ips_count(&self) -> Result<i64, DataManagerError> {
        self.source.scalar(&self.code, ScalarMetric::IpsScanned).await
    }

    pub async fn get_total_alive_hosts(&self) -> Result<i64, DataManagerError> {
        self.source.scalar(&self.code, ScalarMetric::IpsActive).await
    }

    pub async fn get_port_amount(&self) -> Result<i64, DataManagerError> {
        self.source.scalar(&self.code, ScalarMetric::PortsScanned).await
    }

    pub async fn get_total_open_ports(&self) -> Result<i64, DataManagerError> {
        self.source.scalar(&self.code, ScalarMetric::PortsOpen).await
    }

    pub async fn get_total_open_ports_plot(&self) -> Result<TimeSeries, DataManagerError> {
        self.source.open_ports_plot(&self.code).await
    }

    pub async fn get_unique_open_ports(&self) -> Result<FrequencyMap, DataManagerError> {
        self.shaped(FrequencyMetric::OpenPorts).await
    }

    pub async fn get_products_count(&self) -> Result<FrequencyMap, DataManagerError> {
        self.shaped(FrequencyMetric::Products).await
    }

    pub async fn get_services_count(&self) -> Result<FrequencyMap, DataManagerError> {
        self.shaped(FrequencyMetric::Services).await
    }

    pub async fn get_versions_count(&self) -> Result<FrequencyMap, DataManagerError> {
        self.shaped(FrequencyMetric::Versions).await
    }

    pub async fn get_os_count(&self) -> Result<FrequencyMap, DataManagerError> {
        self.shaped(FrequencyMetric::Os).await
    }

    pub async fn get_cpe_count(&self) -> Result<FrequencyMap, DataManagerError> {
        self.shaped(FrequencyMetric::Cpe).await
    }

    pub async fn get_summary(&self) -> Result<SummaryRecord, DataManagerError> {
        self.source.summary(&self.code).await
    }
}
