pub mod client;

use alloy_rpc_types_eth::Transaction;
use async_trait::async_trait;
use evmbridge_types::{aliases::BlockNumber, engine_api::ExecutionBlock, txpool::TxpoolContent};

use crate::error::ExecutionError;

pub const ETH_GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
pub const TXPOOL_CONTENT: &str = "txpool_content";

/// The public chain endpoint: read-only queries against the execution node.
#[async_trait]
pub trait EthRpc: Send + Sync {
    /// Corresponds to the `txpool_content` RPC method.
    async fn txpool_content(&self) -> Result<TxpoolContent<Transaction>, ExecutionError>;

    /// Corresponds to the `eth_getBlockByNumber` RPC method, without transaction bodies.
    /// `None` when the node has no block at that height.
    async fn get_block_by_number(
        &self,
        number: BlockNumber,
    ) -> Result<Option<ExecutionBlock>, ExecutionError>;
}
