//! treemux server.
//!
//! Loads a route table, builds the routing tree against the built-in
//! handler registry and serves it over HTTP until Ctrl+C.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use treemux::config::{load_config, watcher::ConfigWatcher, HandlerRegistry, RouterConfig};
use treemux::http::HttpServer;
use treemux::lifecycle::Shutdown;
use treemux::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "treemux")]
#[command(about = "Serve a tree-structured route table", long_about = None)]
struct Cli {
    /// Route table (TOML). Without it only the root fallback answers.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload the route table when the file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    logging::init(&config.observability)?;
    tracing::info!("treemux v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(&config, HandlerRegistry::with_builtins())?;

    let (config_updates, _watcher) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (rx, Some(watcher.run()?))
        }
        _ => (mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown.trigger_on_ctrl_c().await;
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
