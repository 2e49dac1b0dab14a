//! On-disk configuration of the bridge.

use std::{
    fmt,
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::ValueEnum;
use evmbridge_execution::{ExecutionConfig, RpcEndpoint};
use evmbridge_types::aliases::{Address, B256};
use serde::{Deserialize, Serialize};

pub use crate::file::{load_config, save_config};
use crate::error::Error;

pub const DEFAULT_ENGINE_ENDPOINT: &str = "http://localhost:8551";
pub const DEFAULT_ETH_ENDPOINT: &str = "http://localhost:8545";
pub const DEFAULT_LISTEN_PORT: u16 = 7980;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Engine API endpoint: an `http(s)://` URL or an IPC socket path.
    pub engine_endpoint: String,
    /// Chain RPC endpoint used for the transaction pool and block lookups.
    pub eth_endpoint: String,
    /// JWT secret file. Only read when the engine endpoint is HTTP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_path: Option<PathBuf>,
    pub genesis_hash: B256,
    pub fee_recipient: Address,
    /// Where the driver-facing JSON-RPC server listens.
    pub listen_addr: SocketAddr,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine_endpoint: DEFAULT_ENGINE_ENDPOINT.to_string(),
            eth_endpoint: DEFAULT_ETH_ENDPOINT.to_string(),
            jwt_path: None,
            genesis_hash: B256::ZERO,
            fee_recipient: Address::ZERO,
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_LISTEN_PORT)),
            logging: LoggingConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    pub fn engine_endpoint(&self) -> Result<RpcEndpoint, Error> {
        parse_endpoint("engine", &self.engine_endpoint)
    }

    pub fn eth_endpoint(&self) -> Result<RpcEndpoint, Error> {
        parse_endpoint("eth", &self.eth_endpoint)
    }

    /// Builds the adapter configuration. `jwt_secret` has already been read from `jwt_path`.
    pub fn execution_config(&self, jwt_secret: Option<[u8; 32]>) -> Result<ExecutionConfig, Error> {
        Ok(ExecutionConfig {
            engine_endpoint: self.engine_endpoint()?,
            eth_endpoint: self.eth_endpoint()?,
            jwt_secret,
            genesis_hash: self.genesis_hash,
            fee_recipient: self.fee_recipient,
        })
    }
}

fn parse_endpoint(field: &'static str, value: &str) -> Result<RpcEndpoint, Error> {
    value.parse().map_err(|e: url::ParseError| Error::InvalidEndpoint {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plaintext,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flavor", rename_all = "snake_case")]
pub enum RuntimeConfig {
    SingleThreaded,
    /// `worker_threads = 0` lets tokio pick one per core.
    MultiThreaded { worker_threads: usize },
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::MultiThreaded { worker_threads: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_local_nodes() {
        let config = Config::default();
        assert!(matches!(config.engine_endpoint().unwrap(), RpcEndpoint::Http(_)));
        assert_eq!(config.listen_addr.port(), DEFAULT_LISTEN_PORT);

        let exec = config.execution_config(None).unwrap();
        assert_eq!(exec.genesis_hash, B256::ZERO);
        assert!(exec.jwt_secret.is_none());
    }

    #[test]
    fn ipc_paths_are_accepted() {
        let config =
            Config { engine_endpoint: "/var/run/geth.ipc".to_string(), ..Config::default() };
        assert_eq!(
            config.engine_endpoint().unwrap(),
            RpcEndpoint::Ipc(PathBuf::from("/var/run/geth.ipc"))
        );
    }

    #[test]
    fn broken_url_names_the_field() {
        let config = Config { eth_endpoint: "https://".to_string(), ..Config::default() };
        let err = config.execution_config(None).unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint { field: "eth", .. }));
    }

    #[test]
    fn log_level_renders_as_directive() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }
}
