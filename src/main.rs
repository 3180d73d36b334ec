//! Container binary: initialize the demo application and serve it.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use app_container::config::{loader, ContainerConfig};
use app_container::lifecycle::{startup, Shutdown};
use app_container::observability::{logging, metrics};
use app_container::{demo, HttpServer};

#[derive(Parser)]
#[command(name = "app-container")]
#[command(about = "Application container with component wiring and route dispatch", long_about = None)]
struct Cli {
    /// Path to the container configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("app-container v0.1.0 starting");

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => ContainerConfig::default(),
    };

    tracing::info!(
        namespace = %config.scan.package_scan,
        source_root = %config.scan.source_root,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let container = startup::start(config, demo::definitions())?;

    let listener = TcpListener::bind(&container.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(container.config(), container.dispatcher());
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
