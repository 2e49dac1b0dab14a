#![allow(missing_docs)]
use std::{fmt, sync::Arc};

use alloy_rpc_types_engine::{ForkchoiceState, PayloadAttributes};
use async_trait::async_trait;
use evmbridge_types::engine_api::{
    DraftPayload, ForkchoiceResponse, PayloadHandle, PayloadStatusResponse,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::trace;

use super::EngineApi;
use crate::{
    engine_api::{EngineCapabilities, capabilities::*},
    error::ExecutionError,
    transport::{self, Transport},
};

/// Engine API client over any [`Transport`].
///
/// Responses that do not match the expected shape are reported as
/// [`ExecutionError::MalformedPayload`] tagged with the method name.
pub struct EngineApiClient {
    transport: Arc<dyn Transport>,
}

impl EngineApiClient {
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn request<P, R>(&self, method: &'static str, params: P) -> Result<R, ExecutionError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)
            .map_err(|e| ExecutionError::Transport { method, reason: e.to_string() })?;
        trace!(%method, %params, "engine request");

        let result = transport::call(self.transport.as_ref(), method, params).await?;

        serde_json::from_value(result)
            .map_err(|e| ExecutionError::MalformedPayload { method, reason: e.to_string() })
    }
}

impl fmt::Debug for EngineApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineApiClient").field("transport", &"<dyn Transport>").finish()
    }
}

#[async_trait]
impl EngineApi for EngineApiClient {
    async fn forkchoice_updated(
        &self,
        state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceResponse, ExecutionError> {
        self.request(ENGINE_FORKCHOICE_UPDATED_V1, (state, payload_attributes)).await
    }

    async fn get_payload(&self, handle: PayloadHandle) -> Result<DraftPayload, ExecutionError> {
        self.request(ENGINE_GET_PAYLOAD_V1, (handle,)).await
    }

    async fn new_payload(
        &self,
        payload: DraftPayload,
    ) -> Result<PayloadStatusResponse, ExecutionError> {
        self.request(ENGINE_NEW_PAYLOAD_V1, (payload,)).await
    }

    async fn exchange_capabilities(&self) -> Result<EngineCapabilities, ExecutionError> {
        let advertised: Vec<String> = self
            .request(ENGINE_EXCHANGE_CAPABILITIES, (ADAPTER_CAPABILITIES.to_vec(),))
            .await?;

        Ok(EngineCapabilities::from_response_strings(advertised.into_iter().collect()))
    }
}
