use clap::{Parser, Subcommand};
use scan_report_data_management::{config::DatabaseConfig, database::db::SummaryDatabase, CountryVerification, DataManager};
use scan_report_lib::frequency::FrequencyMap;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// CLI for inspecting the scan summary table
#[derive(Parser)]
#[command(name = "ScanReportCLI")]
#[command(about = "A CLI to inspect the scan summary table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every country code in the summary table
    Countries,
    /// Check whether a country code is known
    Verify { country_code: String },
    /// Print the latest summary for a country
    Summary { country_code: String },
    /// Print the open ports time series for a country
    Plot { country_code: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = DatabaseConfig::from_env()?;
    let data_manager = DataManager::new(SummaryDatabase::connect(&config));

    match &cli.command {
        Commands::Countries => {
            for code in data_manager.get_country_codes().await? {
                println!("{}", code);
            }
        },
        Commands::Verify { country_code } => {
            let verdict = match data_manager.verify_country_code(country_code).await {
                CountryVerification::Member => "known",
                CountryVerification::NonMember => "unknown",
                CountryVerification::Indeterminate => "could not be verified",
            };
            println!("{}: {}", country_code.to_uppercase(), verdict);
        },
        Commands::Summary { country_code } => {
            let summary = data_manager.get_summary(country_code).await?;
            println!("Country\t{}", summary.country);
            println!("Last scan\t{}", summary.port_scan_done_ts.map(|ts| ts.to_rfc3339()).unwrap_or_else(|| "-".into()));
            print_scalar("IPs scanned", summary.total_ips_scanned);
            print_scalar("IPs active", summary.total_ips_active);
            print_scalar("Ports scanned", summary.total_ports_scanned);
            print_scalar("Ports open", summary.total_ports_open);
            print_frequency("Open ports", &summary.open_ports_count);
            print_frequency("Services", &summary.services_count);
            print_frequency("Products", &summary.products_count);
            print_frequency("Versions", &summary.versions_count);
            print_frequency("OS", &summary.os_count);
            print_frequency("CPE", &summary.cpe_count);
        },
        Commands::Plot { country_code } => {
            let series = data_manager.get_total_open_ports_plot(country_code).await?;
            for (label, value) in series.labels.iter().zip(&series.values) {
                println!("{}\t{}", label, value);
            }
        },
    }

    Ok(())
}

fn print_scalar(title: &str, value: Option<i64>) {
    println!("{}\t{}", title, value.map(|v| v.to_string()).unwrap_or_else(|| "-".into()));
}

fn print_frequency(title: &str, content: &FrequencyMap) {
    println!("{} ({} distinct)", title, content.len());
    for (label, count) in content.clone().shape().iter() {
        println!("\t{}\t{}", label, count);
    }
}
