use async_trait::async_trait;
use evmbridge_types::{
    Hash, Tx,
    aliases::{BlockNumber, BlockTimestamp},
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::ExecutionError;

/// Result of chain initialization: the genesis state root and the block gas limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitChainOutcome {
    pub state_root: Hash,
    pub gas_limit: u64,
}

/// Result of executing a batch of transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutcome {
    pub state_root: Hash,
    pub gas_used: u64,
}

/// The contract a block-production driver uses to delegate execution.
///
/// Every call runs to completion or fails; there is no partial success. The
/// cancellation token aborts whichever RPC round trip is in flight. Calls for
/// the same chain are expected to be serialized by the driver.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Prepares the engine to build on top of genesis.
    async fn init_chain(
        &self,
        cancel: &CancellationToken,
        genesis_time: BlockTimestamp,
        initial_height: BlockNumber,
        chain_id: &str,
    ) -> Result<InitChainOutcome, ExecutionError>;

    /// Pending transactions followed by queued ones, in engine order.
    async fn get_txs(&self, cancel: &CancellationToken) -> Result<Vec<Tx>, ExecutionError>;

    /// Builds the block at `height` on top of `prev_state_root` containing `txs`.
    async fn execute_txs(
        &self,
        cancel: &CancellationToken,
        txs: Vec<Tx>,
        height: BlockNumber,
        timestamp: BlockTimestamp,
        prev_state_root: Hash,
    ) -> Result<ExecutionOutcome, ExecutionError>;

    /// Marks the block at `height` as head, safe and finalized.
    async fn set_final(
        &self,
        cancel: &CancellationToken,
        height: BlockNumber,
    ) -> Result<(), ExecutionError>;
}
