// crates/execution/src/lib.rs

pub mod adapter;
pub mod client;
pub mod config;
pub mod engine_api;
pub mod error;
pub mod eth_rpc;
pub mod executor;
pub mod proxy;
pub mod transport;

pub use adapter::ExecutionAdapter;
pub use client::ExecutionClient;
pub use config::{ExecutionConfig, RpcEndpoint};
pub use engine_api::{EngineApi, EngineCapabilities};
pub use error::ExecutionError;
pub use eth_rpc::EthRpc;
pub use executor::{ExecutionOutcome, Executor, InitChainOutcome};
pub use proxy::{ProxyHandle, ProxyServer};
