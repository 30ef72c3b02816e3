// Identity Registry Service entry point
//
// Loads configuration, initializes the record store and starts the REST
// API. The OTP stores live inside the verification service and are always
// in-memory; only the record store has a choice of backends.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use identity_registry::api::ApiServer;
use identity_registry::config::{NodeConfig, StorageConfig};
use identity_registry::service::VerificationService;
use identity_registry::storage::{MemoryRecordStore, RecordStore, SqliteRecordStore};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line argument parser for the Identity Registry Service.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,
}

/// Initialize the record store named by the configuration.
fn init_storage(config: &StorageConfig) -> Result<Arc<dyn RecordStore>, anyhow::Error> {
    match config.engine.as_str() {
        "sqlite" => {
            info!("Initializing SQLite record store at {}", config.database_path);
            let store = SqliteRecordStore::new(PathBuf::from(&config.database_path));
            store.initialize_schema()?;
            Ok(Arc::new(store))
        }
        "memory" => {
            info!("Initializing in-memory record store");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        other => {
            error!("Unsupported storage engine: {}", other);
            Err(anyhow::anyhow!("Unsupported storage engine: {}", other))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let config = match NodeConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Configuration loaded from {:?}", cli.config);

    let records = match init_storage(&config.storage) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            process::exit(1);
        }
    };

    let otp_ttl = chrono::Duration::seconds(config.otp.ttl_secs as i64);
    let service = Arc::new(VerificationService::new(records, otp_ttl));

    let bind_address = format!("{}:{}", config.api.bind_address, config.api.port);
    let server = ApiServer::new(service, bind_address, config.api.enable_cors);

    info!("Identity Registry Service running. Press Ctrl+C to stop.");

    if let Err(e) = server.start().await {
        error!("Server error: {}", e);
        process::exit(1);
    }

    Ok(())
}
