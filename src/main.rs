//! Order Gateway entry point.
//!
//! Loads `config/{env}.yaml`, initializes logging, wires the three
//! collaborator clients (in-process emulated stores or a Redis live
//! backend) and starts the HTTP server.

use std::sync::Arc;

use anyhow::Context;

use order_gateway::config::AppConfig;
use order_gateway::gateway;
use order_gateway::gateway::state::{AppState, BackendMode};
use order_gateway::logging::init_logging;
use order_gateway::stores::{RedisBlobStore, RedisKeyValueStore, RedisQueue, redis::connect};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    tracing::info!(
        "Starting order gateway (env={}, region={}, emulator={})",
        env,
        config.backend.region,
        config.backend.use_emulator
    );

    let state = if config.backend.use_emulator {
        AppState::emulated(config.backend.clone())
    } else {
        let url = config
            .backend
            .endpoint_url
            .as_deref()
            .context("backend.endpoint_url is required when use_emulator is false")?;
        let con = connect(url)
            .await
            .with_context(|| format!("Failed to connect to live backend at {}", url))?;
        AppState::new(
            Arc::new(RedisKeyValueStore::new(con.clone())),
            Arc::new(RedisBlobStore::new(con.clone())),
            Arc::new(RedisQueue::new(con)),
            config.backend.clone(),
            BackendMode::Live,
        )
    };

    gateway::run_server(&config.gateway.host, config.gateway.port, Arc::new(state)).await;
    Ok(())
}
