use std::{fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use scan_report_data_management::{config::DatabaseConfig, database::db::SummaryDatabase, memory::MemorySource, source::SummarySource, DataManager};
use server::{routes, server_state::ServerState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Serves the per-country scan summary dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "scan-report-server", version, long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Country shown on `/`.
    #[arg(long, default_value = "IS")]
    default_country: String,

    /// Directory served under `/static`.
    #[arg(long, default_value = "server/static")]
    static_dir: PathBuf,

    #[arg(long, default_value = "server/log")]
    log_dir: PathBuf,

    /// Serve summary records from this JSON file instead of the database.
    #[arg(long)]
    fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(cli.log_dir.join("server.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}=debug,scan_report_data_management=debug", env!("CARGO_CRATE_NAME")).into())
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
        .init();

    tracing::info!("Starting server...");

    match &cli.fixture {
        Some(path) => serve(&cli, MemorySource::from_file(path).await?).await,
        None => {
            let config = DatabaseConfig::from_env()?;
            tracing::debug!("Database config: {:?}", config);
            serve(&cli, SummaryDatabase::connect(&config)).await
        },
    }
}

async fn serve<S: SummarySource + 'static>(cli: &Cli, source: S) -> anyhow::Result<()> {
    let server_state = Arc::new(ServerState::new(DataManager::new(source), cli.default_country.to_uppercase()));
    let app = routes::router(server_state, &cli.static_dir);

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
