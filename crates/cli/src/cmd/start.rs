use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use color_eyre::eyre::{self, eyre};
use evmbridge_execution::{ExecutionAdapter, ProxyServer, RpcEndpoint};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{config::Config, file::read_jwt_secret};

#[derive(Parser, Debug, Clone, Default, PartialEq)]
pub struct StartCmd {
    /// Override the Engine API endpoint, e.g. http://localhost:8551 or /path/to/reth.ipc
    #[clap(long)]
    pub engine_endpoint: Option<String>,

    /// Override the chain RPC endpoint, e.g. http://localhost:8545
    #[clap(long)]
    pub eth_endpoint: Option<String>,

    /// Override the JWT secret path used for Engine API authentication
    #[clap(long)]
    pub jwt_path: Option<PathBuf>,

    /// Override the address the driver RPC listens on
    #[clap(long)]
    pub listen_addr: Option<SocketAddr>,
}

impl StartCmd {
    /// Folds the command-line overrides into `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.engine_endpoint {
            config.engine_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.eth_endpoint {
            config.eth_endpoint = endpoint.clone();
        }
        if let Some(path) = &self.jwt_path {
            config.jwt_path = Some(path.clone());
        }
        if let Some(addr) = self.listen_addr {
            config.listen_addr = addr;
        }
    }

    pub async fn run(&self, mut config: Config) -> eyre::Result<()> {
        self.apply(&mut config);

        info!("Bridge is starting...");
        start(config, shutdown_signal()).await?;
        info!("Bridge has stopped");
        Ok(())
    }
}

/// Runs the bridge until `shutdown` is cancelled.
pub async fn start(config: Config, shutdown: CancellationToken) -> eyre::Result<()> {
    let engine_endpoint = config.engine_endpoint()?;

    // JWT auth only applies to HTTP; IPC sockets are trusted by filesystem permissions.
    let jwt_secret = match (&engine_endpoint, &config.jwt_path) {
        (RpcEndpoint::Http(_), Some(path)) => {
            let secret = read_jwt_secret(path)?;
            info!(jwt_path = %path.display(), "Loaded JWT secret");
            Some(secret)
        }
        _ => None,
    };

    let adapter = Arc::new(ExecutionAdapter::connect(config.execution_config(jwt_secret)?).await?);

    adapter.check_capabilities(&shutdown).await.map_err(|e| {
        eyre!("Execution client capability check failed for {engine_endpoint}: {e}")
    })?;

    let proxy = ProxyServer::start(adapter.clone(), config.listen_addr).await?;

    shutdown.cancelled().await;

    proxy.stop().await?;
    match Arc::try_unwrap(adapter) {
        Ok(adapter) => adapter.stop(),
        Err(_) => warn!("Execution adapter still shared after proxy shutdown"),
    }
    Ok(())
}

/// A token cancelled on SIGINT, or SIGTERM on Unix.
fn shutdown_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {
                            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                        }
                        _ = sigterm.recv() => {
                            info!("Received SIGTERM, initiating graceful shutdown...");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to register SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                    info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        trigger.cancel();
    });

    token
}
