//! scrutin daemon — entry point for running the election service.

mod config;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use scrutin_election::ElectionCoordinator;
use scrutin_ledger::{GatewayClient, GatewayConfig};
use scrutin_rpc::RpcServer;
use scrutin_store_lmdb::LmdbEnvironment;

use config::ServiceConfig;

#[derive(Parser)]
#[command(name = "scrutin-daemon", about = "College election service daemon")]
struct Cli {
    /// Data directory for the record store.
    #[arg(long, env = "SCRUTIN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP API port.
    #[arg(long, env = "SCRUTIN_HTTP_PORT")]
    http_port: Option<u16>,

    /// Base URL of the contract gateway.
    #[arg(long, env = "SCRUTIN_GATEWAY_URL")]
    gateway_url: Option<String>,

    /// Address of the deployed voting contract.
    #[arg(long, env = "SCRUTIN_CONTRACT")]
    contract: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "SCRUTIN_LOG_LEVEL")]
    log_level: String,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(cli: &Cli) -> ServiceConfig {
    let file_config: Option<ServiceConfig> = if let Some(ref config_path) = cli.config {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match ServiceConfig::from_toml_str(&contents) {
                Ok(cfg) => {
                    tracing::info!("Loaded config from {}", config_path.display());
                    Some(cfg)
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {e}, using CLI defaults");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read config file {}: {e}, using CLI defaults",
                    config_path.display()
                );
                None
            }
        }
    } else {
        None
    };

    let base = file_config.unwrap_or_default();
    ServiceConfig {
        data_dir: cli.data_dir.clone().unwrap_or(base.data_dir),
        http_port: cli.http_port.unwrap_or(base.http_port),
        gateway_url: cli.gateway_url.clone().unwrap_or(base.gateway_url),
        contract: cli.contract.clone().unwrap_or(base.contract),
        log_level: cli.log_level.clone(),
        ..base
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = load_config(&cli);
    anyhow::ensure!(
        !config.contract.is_empty(),
        "no voting contract configured (set --contract or SCRUTIN_CONTRACT)"
    );

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory {}", config.data_dir.display())
    })?;
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size_mb * 1024 * 1024)
        .with_context(|| format!("failed to open record store at {}", config.data_dir.display()))?;

    // The signing credential never lives in the config file.
    let mut gateway_config = GatewayConfig::read_only(&config.gateway_url, &config.contract);
    gateway_config.poll_interval_ms = config.poll_interval_ms;
    gateway_config.confirm_timeout_secs = config.confirm_timeout_secs;
    match std::env::var("SCRUTIN_SIGNER_KEY") {
        Ok(key) if !key.is_empty() => {
            gateway_config = gateway_config.with_signer(key);
        }
        _ => {
            tracing::warn!(
                "SCRUTIN_SIGNER_KEY not set — running read-only, ledger writes will fail"
            );
        }
    }
    let ledger = Arc::new(GatewayClient::new(gateway_config));

    let coordinator = ElectionCoordinator::new(
        Arc::new(env.election_store()),
        Arc::new(env.user_store()),
        ledger,
    );

    tracing::info!(
        "Starting election service (HTTP:{}, gateway:{}, data:{})",
        config.http_port,
        config.gateway_url,
        config.data_dir.display(),
    );
    let server = RpcServer::new(config.http_port, coordinator);
    server.start().await.context("HTTP server failed")?;

    tracing::info!("scrutin daemon exited cleanly");
    Ok(())
}
