//! esg-ledger: ESG activity ledger service
//!
//! Serves the HTTP API, or verifies the activity chain offline with the
//! `verify` subcommand.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use esg_ledger::api::create_router;
use esg_ledger::config::Config;
use esg_ledger::store::{self, JsonFileStore};
use esg_ledger::EsgService;

#[derive(Parser)]
#[command(name = "esg-ledger")]
#[command(about = "Hash-chained ESG activity ledger with scoring and compliance reports")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "esg-ledger.toml")]
    config: PathBuf,

    /// Data directory (overrides config file)
    #[arg(short, long, env = "ESG_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP port (overrides config file)
    #[arg(short, long, env = "ESG_HTTP_PORT")]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Verify the activity hash chain and exit
    Verify,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("esg_ledger=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting esg-ledger");
    info!("Config file: {}", cli.config.display());

    let mut config = Config::load(&cli.config)?;

    // Apply CLI overrides
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }
    if let Some(port) = cli.port {
        config.server.http_port = port;
    }

    info!("Data dir: {}", config.storage.data_dir.display());

    let store = JsonFileStore::open(&config.storage.data_dir)?;

    // Offline verification only reads the data directory
    if let Some(Command::Verify) = cli.command {
        let service = EsgService::new(Arc::new(store), &config);
        let result = service.verify_ledger();
        println!("{}", serde_json::to_string_pretty(&result)?);
        if !result.valid {
            error!("Activity chain failed verification");
            std::process::exit(1);
        }
        return Ok(());
    }

    store::bootstrap(&store)?;
    let service = Arc::new(EsgService::new(Arc::new(store), &config));

    let app = create_router(service, &config.server.static_dir);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.http_port).parse()?;
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
