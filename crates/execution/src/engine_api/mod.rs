// crates/execution/src/engine_api/mod.rs

pub mod capabilities;
pub mod client;
pub mod jwt;

use alloy_rpc_types_engine::{ForkchoiceState, PayloadAttributes};
use async_trait::async_trait;
pub use capabilities::EngineCapabilities;
use evmbridge_types::engine_api::{
    DraftPayload, ForkchoiceResponse, PayloadHandle, PayloadStatusResponse,
};

use crate::error::ExecutionError;

/// The privileged Engine API surface the adapter drives (V1 methods).
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// `engine_forkchoiceUpdatedV1`. With attributes the engine starts building a
    /// payload on top of `state.head_block_hash`; without, it only moves its heads.
    async fn forkchoice_updated(
        &self,
        state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceResponse, ExecutionError>;

    /// `engine_getPayloadV1`. The handle is consumed.
    async fn get_payload(&self, handle: PayloadHandle) -> Result<DraftPayload, ExecutionError>;

    /// `engine_newPayloadV1`.
    async fn new_payload(&self, payload: DraftPayload)
    -> Result<PayloadStatusResponse, ExecutionError>;

    /// `engine_exchangeCapabilities`.
    async fn exchange_capabilities(&self) -> Result<EngineCapabilities, ExecutionError>;
}
