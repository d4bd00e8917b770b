//! Bootstrap wiring: logging, config, health route, lifecycle controller.

use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use serde_json::json;

use graceful_server::observability::logging;
use graceful_server::{load_config, Server, ServerConfig};

#[derive(Parser)]
#[command(about = "Network-facing request server with graceful shutdown")]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("graceful_server=info,tower_http=info");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    let routes = Router::new().route(
        config.health_path.as_str(),
        get(|| async { Json(json!({ "status": "ok" })) }),
    );

    let server = Server::new(config);
    server
        .start(routes, || tracing::info!("cleanup complete"))
        .await?;
    Ok(())
}
