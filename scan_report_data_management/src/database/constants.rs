use const_format::concatcp;

pub const SUMMARY_TABLE_NAME: &str = "summary";
pub const COUNTRY: &str = "country";
pub const TOTAL_IPS_SCANNED: &str = "total_ips_scanned";
pub const TOTAL_IPS_ACTIVE: &str = "total_ips_active";
pub const TOTAL_PORTS_SCANNED: &str = "total_ports_scanned";
pub const TOTAL_PORTS_OPEN: &str = "total_ports_open";
pub const OPEN_PORTS_COUNT: &str = "open_ports_count";
pub const PRODUCTS_COUNT: &str = "products_count";
pub const SERVICES_COUNT: &str = "services_count";
pub const VERSIONS_COUNT: &str = "versions_count";
pub const OS_COUNT: &str = "os_count";
pub const CPE_COUNT: &str = "cpe_count";
pub const PORT_SCAN_DONE_TS: &str = "port_scan_done_ts";

// A country can have several rows; reads take the most recent one.
pub const LATEST_ROW_FOR_COUNTRY: &str = concatcp!(
    " FROM ", SUMMARY_TABLE_NAME,
    " WHERE ", COUNTRY, " = $1",
    " ORDER BY ", PORT_SCAN_DONE_TS, " DESC NULLS LAST LIMIT 1");

pub const COUNTRY_CODES_QUERY: &str = concatcp!(
    "SELECT DISTINCT ", COUNTRY, "::TEXT AS ", COUNTRY,
    " FROM ", SUMMARY_TABLE_NAME,
    " ORDER BY ", COUNTRY);

/// Newest `$2` scans with both a timestamp and an open port total, handed back oldest first.
pub const OPEN_PORTS_PLOT_QUERY: &str = concatcp!("
    SELECT done_date, open_ports
    FROM (
        SELECT ", PORT_SCAN_DONE_TS, "::DATE AS done_date,
               ", TOTAL_PORTS_OPEN, "::BIGINT AS open_ports
        FROM ", SUMMARY_TABLE_NAME, "
        WHERE ", TOTAL_PORTS_OPEN, " IS NOT NULL
          AND ", PORT_SCAN_DONE_TS, " IS NOT NULL
          AND ", COUNTRY, " = $1
        ORDER BY ", PORT_SCAN_DONE_TS, " DESC
        LIMIT $2
    ) AS recent
    ORDER BY done_date ASC");

pub const SUMMARY_QUERY: &str = concatcp!(
    "SELECT ", COUNTRY, "::TEXT AS ", COUNTRY, ", ",
    TOTAL_IPS_SCANNED, "::BIGINT AS ", TOTAL_IPS_SCANNED, ", ",
    TOTAL_IPS_ACTIVE, "::BIGINT AS ", TOTAL_IPS_ACTIVE, ", ",
    TOTAL_PORTS_SCANNED, "::BIGINT AS ", TOTAL_PORTS_SCANNED, ", ",
    TOTAL_PORTS_OPEN, "::BIGINT AS ", TOTAL_PORTS_OPEN, ", ",
    OPEN_PORTS_COUNT, "::JSON AS ", OPEN_PORTS_COUNT, ", ",
    PRODUCTS_COUNT, "::JSON AS ", PRODUCTS_COUNT, ", ",
    SERVICES_COUNT, "::JSON AS ", SERVICES_COUNT, ", ",
    VERSIONS_COUNT, "::JSON AS ", VERSIONS_COUNT, ", ",
    OS_COUNT, "::JSON AS ", OS_COUNT, ", ",
    CPE_COUNT, "::JSON AS ", CPE_COUNT, ", ",
    PORT_SCAN_DONE_TS, "::TIMESTAMPTZ AS ", PORT_SCAN_DONE_TS,
    LATEST_ROW_FOR_COUNTRY);
