use scan_report_data_management::{source::SummarySource, DataManagerError, VerifiedCountry};
use scan_report_lib::{frequency::FrequencyMap, series::TimeSeries, view::{Dashboard, LineGraph, MultiBlock, SimpleBlock}};

pub const OPEN_PORTS_CANVAS_ID: &str = "line-graph_total-open-ports";

/// Fetches every metric for a country and packs the results into view models.
///
/// The fetches are independent and run concurrently. A failed fetch does not fail the
/// page: scalars become `None`, mappings and the graph come back empty.
pub async fn build_dashboard<S: SummarySource>(country: &VerifiedCountry<'_, S>) -> Dashboard {
    let (ips, alive, ports_scanned, open_ports, open_ports_plot, unique_ports, services, versions, os, products, cpe) = tokio::join!(
        country.get_ips_count(),
        country.get_total_alive_hosts(),
        country.get_port_amount(),
        country.get_total_open_ports(),
        country.get_total_open_ports_plot(),
        country.get_unique_open_ports(),
        country.get_services_count(),
        country.get_versions_count(),
        country.get_os_count(),
        country.get_products_count(),
        country.get_cpe_count(),
    );

    Dashboard {
        country_code: country.code().to_string(),
        simple_blocks: vec![
            simple("Total IPs Scanned", ips),
            simple("Total Active IPs", alive),
            simple("Ports Scanned", ports_scanned),
            simple("Total Open Ports", open_ports),
        ],
        multi_blocks: vec![
            multi("Ports Identified", unique_ports),
            multi("Services Identified", services),
            multi("Versions Identified", versions),
            multi("OS Identified", os),
            multi("Products Identified", products),
            multi("CPE Identified", cpe),
        ],
        line_graphs: vec![
            LineGraph::from_series(OPEN_PORTS_CANVAS_ID, "Total Open Ports", series("Total Open Ports", open_ports_plot)),
        ],
    }
}

fn simple(title: &str, value: Result<i64, DataManagerError>) -> SimpleBlock {
    let value = value.map_err(|err| tracing::warn!("{} unavailable: {}", title, err)).ok();
    SimpleBlock::new(title, value)
}

fn multi(title: &str, content: Result<FrequencyMap, DataManagerError>) -> MultiBlock {
    let content = content.unwrap_or_else(|err| {
        tracing::warn!("{} unavailable: {}", title, err);
        FrequencyMap::new()
    });
    MultiBlock::new(title, content)
}

fn series(title: &str, series: Result<TimeSeries, DataManagerError>) -> TimeSeries {
    series.unwrap_or_else(|err| {
        tracing::warn!("{} graph unavailable: {}", title, err);
        TimeSeries::default()
    })
}
