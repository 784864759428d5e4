//! HTTP server for zenform admin screens.
//!
//! Loads the schema file, seeds in-memory storage with the configured option
//! sets and serves every table until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zenform_api::{router::Router, server::Server};
use zenform_core::config::{EngineConfig, ServerConfig};
use zenform_core::storage::{DiskUploadStore, MemoryStorage};
use zenform_core::Engine;

/// Command-line arguments for the server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Schema file describing tables, fields and options
    #[arg(short, long, default_value = "./schema.json")]
    schema: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Folder receiving image uploads
    #[arg(long, default_value = "./img")]
    image_folder: PathBuf,

    /// Folder receiving other uploads
    #[arg(long, default_value = "./dat")]
    file_folder: PathBuf,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration defects stop the process here
    let schema = EngineConfig::load(&args.schema)
        .and_then(|config| config.build())
        .with_context(|| format!("Invalid schema {}", args.schema.display()))?;

    let config = Arc::new(ServerConfig {
        request_timeout_ms: args.request_timeout_ms,
        image_folder: args.image_folder,
        file_folder: args.file_folder,
        ..ServerConfig::default()
    });

    let storage = Arc::new(MemoryStorage::from_schema(&schema)?);
    let uploads = Arc::new(DiskUploadStore::new(
        config.image_folder.clone(),
        config.file_folder.clone(),
    ));
    let engine = Arc::new(Engine::new(schema, storage, uploads));
    let tables: Vec<&str> = engine.table_names().collect();
    info!(tables = ?tables, "Schema loaded");

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid address {}:{}", args.host, args.port))?;
    let router = Router::new(engine, config);
    let server = Server::bind(addr, router)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(addr = %server.local_addr()?, "Starting zenform server");

    server
        .serve_until(async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for ctrl_c: {}", e);
            }
        })
        .await
        .context("Server error")?;
    info!("Shutting down server");

    Ok(())
}
