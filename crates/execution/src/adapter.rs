//! Engine API sequencing behind the [`Executor`] contract.
//!
//! Each driver call runs one fixed sequence of RPCs:
//!
//! ```text
//! init_chain   forkchoiceUpdated(genesis, attrs) -> getPayload
//! get_txs      txpool_content
//! execute_txs  forkchoiceUpdated(prev, attrs) -> getPayload -> newPayload(draft + txs)
//! set_final    eth_getBlockByNumber -> forkchoiceUpdated(block, none)
//! ```
//!
//! The payload handle returned by a forkchoice update is moved straight into the
//! matching `getPayload` call and never stored, so there is at most one live
//! build per call and nothing to clean up when a step fails.

use std::future::Future;

use alloy_eips::eip2718::Encodable2718;
use alloy_rpc_types_engine::{ForkchoiceState, PayloadAttributes};
use async_trait::async_trait;
use evmbridge_types::{
    Hash, Tx,
    aliases::{Address, B256, BlockHash, BlockNumber, BlockTimestamp},
    engine_api::{DraftPayload, PayloadStatusResponse, derive_prev_randao},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    client::ExecutionClient,
    config::ExecutionConfig,
    engine_api::{EngineCapabilities, capabilities::*},
    error::ExecutionError,
    eth_rpc::{ETH_GET_BLOCK_BY_NUMBER, TXPOOL_CONTENT},
    executor::{ExecutionOutcome, Executor, InitChainOutcome},
};

/// Drives an execution engine through the Engine API on behalf of a driver.
///
/// Share it behind an `Arc`; [`ExecutionAdapter::stop`] takes it by value.
pub struct ExecutionAdapter {
    client: ExecutionClient,
    genesis_hash: B256,
    fee_recipient: Address,
}

impl ExecutionAdapter {
    /// Dials the engine and chain endpoints from `config`.
    ///
    /// Fails with [`ExecutionError::Connection`] if either endpoint cannot be
    /// dialed. No RPC is issued.
    pub async fn connect(config: ExecutionConfig) -> Result<Self, ExecutionError> {
        let client = ExecutionClient::connect(
            &config.engine_endpoint,
            &config.eth_endpoint,
            config.jwt_secret,
        )
        .await?;

        info!(
            engine = %config.engine_endpoint,
            eth = %config.eth_endpoint,
            genesis_hash = %config.genesis_hash,
            fee_recipient = %config.fee_recipient,
            "Execution adapter connected"
        );

        Ok(Self::new(client, config.genesis_hash, config.fee_recipient))
    }

    pub fn new(client: ExecutionClient, genesis_hash: B256, fee_recipient: Address) -> Self {
        Self { client, genesis_hash, fee_recipient }
    }

    /// Asks the engine which Engine API methods it serves.
    pub async fn check_capabilities(
        &self,
        cancel: &CancellationToken,
    ) -> Result<EngineCapabilities, ExecutionError> {
        let caps = self
            .rpc(cancel, ENGINE_EXCHANGE_CAPABILITIES, self.client.engine().exchange_capabilities())
            .await?;

        let missing = caps.missing();
        if missing.is_empty() {
            debug!("Engine supports every required method");
        } else {
            warn!(?missing, "Engine does not advertise methods the adapter relies on");
        }

        Ok(caps)
    }

    /// Closes both connections and drops the adapter.
    ///
    /// Calls still in flight on another clone of the underlying client fail with
    /// [`ExecutionError::Stopped`], as does any later call through such a clone.
    pub fn stop(self) {
        self.client.close();
        info!("Execution adapter stopped");
    }

    /// Runs one RPC round trip unless `cancel` fires or the adapter is stopped first.
    async fn rpc<T>(
        &self,
        cancel: &CancellationToken,
        method: &'static str,
        call: impl Future<Output = Result<T, ExecutionError>>,
    ) -> Result<T, ExecutionError> {
        if self.client.is_closed() {
            return Err(ExecutionError::Stopped { method });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ExecutionError::Cancelled { method }),
            _ = self.client.closed() => Err(ExecutionError::Stopped { method }),
            result = call => result,
        }
    }

    /// Requests a payload build on top of `head` and fetches the resulting draft.
    async fn build_payload(
        &self,
        cancel: &CancellationToken,
        head: BlockHash,
        timestamp: BlockTimestamp,
        prev_randao: B256,
    ) -> Result<DraftPayload, ExecutionError> {
        let state = forkchoice_at(head);
        let attributes = PayloadAttributes {
            timestamp,
            prev_randao,
            suggested_fee_recipient: self.fee_recipient,
            withdrawals: None,
            parent_beacon_block_root: None,
        };

        debug!(%head, timestamp, %prev_randao, "Requesting payload build");
        let handle = self
            .rpc(
                cancel,
                ENGINE_FORKCHOICE_UPDATED_V1,
                self.client.engine().forkchoice_updated(state, Some(attributes)),
            )
            .await?
        .into_payload_handle()
        .ok_or(ExecutionError::MissingPayloadId { method: ENGINE_FORKCHOICE_UPDATED_V1 })?;

        debug!(payload_id = %handle, "Fetching built payload");
        self.rpc(cancel, ENGINE_GET_PAYLOAD_V1, self.client.engine().get_payload(handle)).await
    }
}

#[async_trait]
impl Executor for ExecutionAdapter {
    async fn init_chain(
        &self,
        cancel: &CancellationToken,
        genesis_time: BlockTimestamp,
        initial_height: BlockNumber,
        chain_id: &str,
    ) -> Result<InitChainOutcome, ExecutionError> {
        // Height and chain id are the driver's view; the engine is not asked to confirm them.
        debug!(genesis_time, initial_height, %chain_id, "Initializing chain");

        let draft =
            self.build_payload(cancel, self.genesis_hash, genesis_time, B256::ZERO).await?;

        let state_root = required(draft.state_root, "stateRoot")?;
        let gas_limit: u64 = required(draft.gas_limit, "gasLimit")?.into();

        info!(%state_root, gas_limit, "Chain initialized");
        Ok(InitChainOutcome { state_root: Hash::from(state_root), gas_limit })
    }

    async fn get_txs(&self, cancel: &CancellationToken) -> Result<Vec<Tx>, ExecutionError> {
        let content = self.rpc(cancel, TXPOOL_CONTENT, self.client.eth().txpool_content()).await?;

        let txs: Vec<Tx> = content.iter().map(|tx| tx.inner.inner().encoded_2718().into()).collect();

        debug!(
            pending = content.pending.len(),
            queued = content.queued.len(),
            txs = txs.len(),
            "Collected pool transactions"
        );
        Ok(txs)
    }

    async fn execute_txs(
        &self,
        cancel: &CancellationToken,
        txs: Vec<Tx>,
        height: BlockNumber,
        timestamp: BlockTimestamp,
        prev_state_root: Hash,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let prev_randao = derive_prev_randao(height);
        let head = prev_state_root.into_block_hash();

        let draft = self.build_payload(cancel, head, timestamp, prev_randao).await?;

        // The result reported to the driver is the engine's own draft, read before
        // the driver's transactions replace the proposed ones.
        let state_root = required(draft.state_root, "stateRoot")?;
        let gas_used: u64 = required(draft.gas_used, "gasUsed")?.into();

        let tx_count = txs.len();
        let payload = draft.with_transactions(txs);

        debug!(height, tx_count, "Submitting payload");
        let status = self
            .rpc(cancel, ENGINE_NEW_PAYLOAD_V1, self.client.engine().new_payload(payload))
            .await?;
        ensure_valid(ENGINE_NEW_PAYLOAD_V1, &status)?;

        info!(height, tx_count, %state_root, gas_used, "Executed transactions");
        Ok(ExecutionOutcome { state_root: Hash::from(state_root), gas_used })
    }

    async fn set_final(
        &self,
        cancel: &CancellationToken,
        height: BlockNumber,
    ) -> Result<(), ExecutionError> {
        let block = self
            .rpc(cancel, ETH_GET_BLOCK_BY_NUMBER, self.client.eth().get_block_by_number(height))
            .await?
            .ok_or(ExecutionError::BlockNotFound { height })?;

        debug!(
            height,
            block_hash = %block.block_hash,
            block_number = ?block.block_number.map(u64::from),
            "Finalizing block"
        );
        let response = self
            .rpc(
                cancel,
                ENGINE_FORKCHOICE_UPDATED_V1,
                self.client.engine().forkchoice_updated(forkchoice_at(block.block_hash), None),
            )
            .await?;

        let status = response
            .payload_status
            .ok_or(ExecutionError::MissingPayloadStatus { method: ENGINE_FORKCHOICE_UPDATED_V1 })?;
        ensure_valid(ENGINE_FORKCHOICE_UPDATED_V1, &status)?;

        info!(height, block_hash = %block.block_hash, "Block finalized");
        Ok(())
    }
}

fn forkchoice_at(hash: BlockHash) -> ForkchoiceState {
    ForkchoiceState { head_block_hash: hash, safe_block_hash: hash, finalized_block_hash: hash }
}

fn required<T>(field: Option<T>, name: &str) -> Result<T, ExecutionError> {
    field.ok_or_else(|| ExecutionError::MalformedPayload {
        method: ENGINE_GET_PAYLOAD_V1,
        reason: format!("missing {name}"),
    })
}

fn ensure_valid(
    method: &'static str,
    status: &PayloadStatusResponse,
) -> Result<(), ExecutionError> {
    match status.kind() {
        Some(kind) if kind.is_valid() => Ok(()),
        _ => {
            warn!(
                %method,
                status = status.status.as_deref().unwrap_or("<missing>"),
                validation_error = status.validation_error.as_deref().unwrap_or_default(),
                "Engine did not accept payload"
            );
            Err(ExecutionError::InvalidPayloadStatus { method, status: status.status.clone() })
        }
    }
}
