//! Otter gateway binary entry point.
//!
//! Loads TOML configuration, constructs the provider pool, store,
//! registry, and relay, then runs the axum server with graceful
//! shutdown on ctrl-c.

use anyhow::Result;
use model::{ModelRegistry, ProviderPool};
use otter_gateway::{ApiKeySessions, AppState, GatewayConfig, StoreBackend, serve};
use relay::{Relay, Toolbox};
use std::sync::Arc;
use store::{ChatStore, MemStore, SqliteStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing from RUST_LOG (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load configuration.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gateway.toml".to_string());
    let config = GatewayConfig::load(&config_path)?;
    tracing::info!("loaded configuration from {config_path}");

    match config.store.backend {
        StoreBackend::Sqlite => {
            let path = config.store.path.clone();
            tracing::info!("using sqlite store at {path}");
            run(config, SqliteStore::open(&path)?).await
        }
        StoreBackend::InMemory => {
            tracing::info!("using in-memory store");
            run(config, MemStore::new()).await
        }
    }
}

/// Wire the application over the chosen store and serve until ctrl-c.
async fn run<S: ChatStore + 'static>(config: GatewayConfig, store: S) -> Result<()> {
    let client = reqwest::Client::new();

    let backends = ProviderPool::from_keys(client.clone(), &config.providers)?;
    let configured: Vec<&str> = backends.kinds().map(|k| k.as_str()).collect();
    tracing::info!("configured providers: {configured:?}");

    let registry = Arc::new(ModelRegistry::standard());
    let relay = Relay::new(
        Arc::clone(&registry),
        backends,
        store.clone(),
        Toolbox::new(client),
    );
    let sessions = Arc::new(ApiKeySessions::from_config(&config.auth));

    let state = AppState {
        relay,
        registry,
        store,
        sessions,
    };

    let handle = serve(state, &config.server.bind).await?;

    signal::ctrl_c().await?;
    tracing::info!("shutting down");
    handle.shutdown().await?;
    Ok(())
}
