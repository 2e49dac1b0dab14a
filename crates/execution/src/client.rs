use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    config::RpcEndpoint,
    engine_api::{EngineApi, client::EngineApiClient},
    error::ExecutionError,
    eth_rpc::{EthRpc, client::EthRpcClient},
    transport::{Transport, http::HttpTransport, ipc::IpcTransport},
};

/// The two connections held towards an execution node.
///
/// The Engine API client carries the consensus-critical calls (forkchoice,
/// payload building and validation); the Eth client carries read-only queries.
///
/// Clones share one closed flag: once any clone is closed, none of them may
/// issue further calls.
#[derive(Clone)]
pub struct ExecutionClient {
    pub engine: Arc<dyn EngineApi>,
    pub eth: Arc<dyn EthRpc>,
    closed: CancellationToken,
}

impl ExecutionClient {
    /// Dials both endpoints. Nothing is sent over either connection.
    ///
    /// The JWT secret, when present, is only attached to an HTTP engine endpoint.
    pub async fn connect(
        engine_endpoint: &RpcEndpoint,
        eth_endpoint: &RpcEndpoint,
        jwt_secret: Option<[u8; 32]>,
    ) -> Result<Self, ExecutionError> {
        let engine_transport = dial(engine_endpoint, jwt_secret).await?;
        let eth_transport = dial(eth_endpoint, None).await?;

        debug!(engine = %engine_endpoint, eth = %eth_endpoint, "Dialed execution endpoints");

        Ok(Self::from_parts(
            Arc::new(EngineApiClient::from_shared(engine_transport)),
            Arc::new(EthRpcClient::from_shared(eth_transport)),
        ))
    }

    pub fn from_parts(engine: Arc<dyn EngineApi>, eth: Arc<dyn EthRpc>) -> Self {
        Self { engine, eth, closed: CancellationToken::new() }
    }

    /// Marks the connections closed and aborts calls still waiting on them.
    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once [`ExecutionClient::close`] has been called on any clone.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    pub fn engine(&self) -> &dyn EngineApi {
        self.engine.as_ref()
    }

    pub fn eth(&self) -> &dyn EthRpc {
        self.eth.as_ref()
    }
}

async fn dial(
    endpoint: &RpcEndpoint,
    jwt_secret: Option<[u8; 32]>,
) -> Result<Arc<dyn Transport>, ExecutionError> {
    let connection_error =
        |reason: String| ExecutionError::Connection { endpoint: endpoint.to_string(), reason };

    match endpoint {
        RpcEndpoint::Http(url) => {
            let mut transport =
                HttpTransport::new(url.clone()).map_err(|e| connection_error(format!("{e:#}")))?;
            if let Some(secret) = jwt_secret {
                transport = transport.with_jwt(secret);
            }
            Ok(Arc::new(transport))
        }
        RpcEndpoint::Ipc(path) => {
            let transport = IpcTransport::new(path);
            transport.probe().await.map_err(|e| connection_error(format!("{e:#}")))?;
            Ok(Arc::new(transport))
        }
    }
}
