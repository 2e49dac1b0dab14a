use std::{fmt, sync::Arc};

use alloy_rpc_types_eth::Transaction;
use async_trait::async_trait;
use evmbridge_types::{aliases::BlockNumber, engine_api::ExecutionBlock, txpool::TxpoolContent};
use serde_json::json;

use super::{ETH_GET_BLOCK_BY_NUMBER, EthRpc, TXPOOL_CONTENT};
use crate::{
    error::ExecutionError,
    transport::{self, Transport},
};

pub struct EthRpcClient {
    transport: Arc<dyn Transport>,
}

impl EthRpcClient {
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

impl fmt::Debug for EthRpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthRpcClient").field("transport", &"<dyn Transport>").finish()
    }
}

#[async_trait]
impl EthRpc for EthRpcClient {
    async fn txpool_content(&self) -> Result<TxpoolContent<Transaction>, ExecutionError> {
        let pool_error = |reason: String| ExecutionError::PoolQuery { method: TXPOOL_CONTENT, reason };

        let result = transport::call(self.transport.as_ref(), TXPOOL_CONTENT, json!([]))
            .await
            .map_err(|e| pool_error(e.to_string()))?;

        serde_json::from_value(result).map_err(|e| pool_error(e.to_string()))
    }

    async fn get_block_by_number(
        &self,
        number: BlockNumber,
    ) -> Result<Option<ExecutionBlock>, ExecutionError> {
        let return_full_transaction_objects = false;
        let params = json!([format!("{number:#x}"), return_full_transaction_objects]);

        let result = transport::call(self.transport.as_ref(), ETH_GET_BLOCK_BY_NUMBER, params).await?;

        serde_json::from_value(result).map_err(|e| ExecutionError::Transport {
            method: ETH_GET_BLOCK_BY_NUMBER,
            reason: format!("unexpected block shape: {e}"),
        })
    }
}
