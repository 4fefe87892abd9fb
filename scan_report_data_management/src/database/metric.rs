use const_format::concatcp;
use scan_report_lib::{frequency::FrequencyMap, summary::SummaryRecord};

use super::constants::*;

/// Single-number columns of the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarMetric {
    IpsScanned,
    IpsActive,
    PortsScanned,
    PortsOpen,
}

impl ScalarMetric {
    pub const ALL: [ScalarMetric; 4] = [
        ScalarMetric::IpsScanned,
        ScalarMetric::IpsActive,
        ScalarMetric::PortsScanned,
        ScalarMetric::PortsOpen,
    ];

    pub fn column(self) -> &'static str {
        match self {
            ScalarMetric::IpsScanned => TOTAL_IPS_SCANNED,
            ScalarMetric::IpsActive => TOTAL_IPS_ACTIVE,
            ScalarMetric::PortsScanned => TOTAL_PORTS_SCANNED,
            ScalarMetric::PortsOpen => TOTAL_PORTS_OPEN,
        }
    }

    pub fn query(self) -> &'static str {
        match self {
            ScalarMetric::IpsScanned => concatcp!("SELECT ", TOTAL_IPS_SCANNED, "::BIGINT", LATEST_ROW_FOR_COUNTRY),
            ScalarMetric::IpsActive => concatcp!("SELECT ", TOTAL_IPS_ACTIVE, "::BIGINT", LATEST_ROW_FOR_COUNTRY),
            ScalarMetric::PortsScanned => concatcp!("SELECT ", TOTAL_PORTS_SCANNED, "::BIGINT", LATEST_ROW_FOR_COUNTRY),
            ScalarMetric::PortsOpen => concatcp!("SELECT ", TOTAL_PORTS_OPEN, "::BIGINT", LATEST_ROW_FOR_COUNTRY),
        }
    }

    pub fn select(self, record: &SummaryRecord) -> Option<i64> {
        match self {
            ScalarMetric::IpsScanned => record.total_ips_scanned,
            ScalarMetric::IpsActive => record.total_ips_active,
            ScalarMetric::PortsScanned => record.total_ports_scanned,
            ScalarMetric::PortsOpen => record.total_ports_open,
        }
    }
}

/// Label -> count columns of the summary table, stored as JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyMetric {
    OpenPorts,
    Products,
    Services,
    Versions,
    Os,
    Cpe,
}

impl FrequencyMetric {
    pub const ALL: [FrequencyMetric; 6] = [
        FrequencyMetric::OpenPorts,
        FrequencyMetric::Products,
        FrequencyMetric::Services,
        FrequencyMetric::Versions,
        FrequencyMetric::Os,
        FrequencyMetric::Cpe,
    ];

    pub fn column(self) -> &'static str {
        match self {
            FrequencyMetric::OpenPorts => OPEN_PORTS_COUNT,
            FrequencyMetric::Products => PRODUCTS_COUNT,
            FrequencyMetric::Services => SERVICES_COUNT,
            FrequencyMetric::Versions => VERSIONS_COUNT,
            FrequencyMetric::Os => OS_COUNT,
            FrequencyMetric::Cpe => CPE_COUNT,
        }
    }

    pub fn query(self) -> &'static str {
        match self {
            FrequencyMetric::OpenPorts => concatcp!("SELECT ", OPEN_PORTS_COUNT, "::JSON", LATEST_ROW_FOR_COUNTRY),
            FrequencyMetric::Products => concatcp!("SELECT ", PRODUCTS_COUNT, "::JSON", LATEST_ROW_FOR_COUNTRY),
            FrequencyMetric::Services => concatcp!("SELECT ", SERVICES_COUNT, "::JSON", LATEST_ROW_FOR_COUNTRY),
            FrequencyMetric::Versions => concatcp!("SELECT ", VERSIONS_COUNT, "::JSON", LATEST_ROW_FOR_COUNTRY),
            FrequencyMetric::Os => concatcp!("SELECT ", OS_COUNT, "::JSON", LATEST_ROW_FOR_COUNTRY),
            FrequencyMetric::Cpe => concatcp!("SELECT ", CPE_COUNT, "::JSON", LATEST_ROW_FOR_COUNTRY),
        }
    }

    pub fn select(self, record: &SummaryRecord) -> &FrequencyMap {
        match self {
            FrequencyMetric::OpenPorts => &record.open_ports_count,
            FrequencyMetric::Products => &record.products_count,
            FrequencyMetric::Services => &record.services_count,
            FrequencyMetric::Versions => &record.versions_count,
            FrequencyMetric::Os => &record.os_count,
            FrequencyMetric::Cpe => &record.cpe_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_query_binds_the_country_code() {
        let queries = ScalarMetric::ALL.iter().map(|m| m.query())
            .chain(FrequencyMetric::ALL.iter().map(|m| m.query()))
            .chain([SUMMARY_QUERY, OPEN_PORTS_PLOT_QUERY]);

        for query in queries {
            assert!(query.contains("country = $1"), "unbound query: {query}");
            assert!(!query.contains('\''), "literal in query: {query}");
        }
    }

    #[test]
    fn queries_select_their_own_column() {
        for metric in ScalarMetric::ALL {
            assert!(metric.query().starts_with(&format!("SELECT {}::BIGINT FROM summary", metric.column())));
        }
        for metric in FrequencyMetric::ALL {
            assert!(metric.query().starts_with(&format!("SELECT {}::JSON FROM summary", metric.column())));
        }
    }

    #[test]
    fn mappings_are_read_as_json_text() {
        // JSONB reorders object keys, which would reorder tied counts.
        for query in FrequencyMetric::ALL.iter().map(|m| m.query()).chain([SUMMARY_QUERY]) {
            assert!(!query.contains("JSONB"), "key order lost in: {query}");
        }
        for metric in FrequencyMetric::ALL {
            assert!(SUMMARY_QUERY.contains(&format!("{0}::JSON AS {0}", metric.column())));
        }
    }

    #[test]
    fn select_reads_matching_field() {
        let mut record = SummaryRecord::new("IS");
        record.total_ports_open = Some(42);
        record.os_count.insert("Linux", 7);

        assert_eq!(ScalarMetric::PortsOpen.select(&record), Some(42));
        assert_eq!(ScalarMetric::IpsScanned.select(&record), None);
        assert_eq!(FrequencyMetric::Os.select(&record).get("Linux"), Some(7));
        assert!(FrequencyMetric::Cpe.select(&record).is_empty());
    }

    #[test]
    fn plot_query_limits_then_reorders() {
        let inner = OPEN_PORTS_PLOT_QUERY.find("DESC").unwrap();
        let limit = OPEN_PORTS_PLOT_QUERY.find("LIMIT $2").unwrap();
        let outer = OPEN_PORTS_PLOT_QUERY.rfind("ORDER BY done_date ASC").unwrap();
        assert!(inner < limit && limit < outer);
    }
}
