//! JSON-RPC front door through which a driver reaches an [`Executor`].

use std::{io, net::SocketAddr, sync::Arc};

use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use evmbridge_types::{
    Hash, Tx,
    aliases::{BlockNumber, BlockTimestamp},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::{
    net::{TcpListener, ToSocketAddrs},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    error::ExecutionError,
    executor::Executor,
    transport::{JsonRpcError, JsonRpcResponse},
};

pub const INIT_CHAIN: &str = "execution_initChain";
pub const GET_TXS: &str = "execution_getTxs";
pub const EXECUTE_TXS: &str = "execution_executeTxs";
pub const SET_FINAL: &str = "execution_setFinal";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
const EXECUTION_FAILED: i64 = -32000;

#[derive(Debug, Deserialize)]
struct ProxyRequest {
    method: String,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    id: Value,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitChainParams {
    pub genesis_time: BlockTimestamp,
    pub initial_height: BlockNumber,
    pub chain_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTxsParams {
    #[serde(default)]
    pub txs: Vec<Tx>,
    pub block_height: BlockNumber,
    pub timestamp: BlockTimestamp,
    pub prev_state_root: Hash,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFinalParams {
    pub block_height: BlockNumber,
}

enum ProxyError {
    Parse(String),
    InvalidRequest(String),
    MethodNotFound(String),
    InvalidParams(String),
    Execution(ExecutionError),
}

impl From<ExecutionError> for ProxyError {
    fn from(e: ExecutionError) -> Self {
        Self::Execution(e)
    }
}

impl ProxyError {
    fn into_rpc_error(self) -> JsonRpcError {
        match self {
            Self::Parse(reason) => {
                JsonRpcError { code: PARSE_ERROR, message: format!("parse error: {reason}") }
            }
            Self::InvalidRequest(reason) => {
                JsonRpcError { code: INVALID_REQUEST, message: format!("invalid request: {reason}") }
            }
            Self::MethodNotFound(method) => {
                JsonRpcError { code: METHOD_NOT_FOUND, message: format!("method {method} not found") }
            }
            Self::InvalidParams(reason) => JsonRpcError { code: INVALID_PARAMS, message: reason },
            Self::Execution(e) => JsonRpcError { code: EXECUTION_FAILED, message: e.to_string() },
        }
    }
}

#[derive(Clone)]
struct ProxyState {
    executor: Arc<dyn Executor>,
    shutdown: CancellationToken,
}

/// Serves an [`Executor`] over HTTP JSON-RPC.
pub struct ProxyServer;

impl ProxyServer {
    /// Binds `listen_addr` and serves in a background task until stopped.
    pub async fn start(
        executor: Arc<dyn Executor>,
        listen_addr: impl ToSocketAddrs,
    ) -> io::Result<ProxyHandle> {
        let shutdown = CancellationToken::new();
        let state = ProxyState { executor, shutdown: shutdown.clone() };
        let app = Router::new().route("/", post(handle)).with_state(state);

        let listener = TcpListener::bind(listen_addr).await?;
        let local_addr = listener.local_addr()?;
        info!(address = %local_addr, "Serving execution proxy");

        let signal = shutdown.clone().cancelled_owned();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).with_graceful_shutdown(signal).await
        });

        Ok(ProxyHandle { local_addr, shutdown, task })
    }
}

/// A running proxy. Dropping it leaves the server running; call [`ProxyHandle::stop`].
pub struct ProxyHandle {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<io::Result<()>>,
}

impl ProxyHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Cancels in-flight calls and waits for the server to wind down.
    pub async fn stop(self) -> io::Result<()> {
        self.shutdown.cancel();
        let result = self.task.await.map_err(io::Error::other)?;
        info!(address = %self.local_addr, "Execution proxy stopped");
        result
    }
}

async fn handle(State(state): State<ProxyState>, body: Bytes) -> Json<JsonRpcResponse> {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err((e, id)) => {
            let error = e.into_rpc_error();
            warn!(code = error.code, message = %error.message, "Rejected proxy request");
            return Json(failure(error, id));
        }
    };

    debug!(method = %request.method, "Proxy request");

    let cancel = state.shutdown.child_token();
    let outcome =
        dispatch(state.executor.as_ref(), &cancel, &request.method, request.params).await;

    let response = match outcome {
        Ok(result) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id: request.id,
        },
        Err(e) => {
            let error = e.into_rpc_error();
            error!(
                method = %request.method,
                code = error.code,
                message = %error.message,
                "Proxy call failed"
            );
            failure(error, request.id)
        }
    };

    Json(response)
}

fn failure(error: JsonRpcError, id: Value) -> JsonRpcResponse {
    JsonRpcResponse { jsonrpc: "2.0".to_string(), result: None, error: Some(error), id }
}

/// Decodes a request body, pairing any failure with the id to echo back.
///
/// Bodies that are not JSON at all answer with a null id; well-formed JSON that
/// is not a request object keeps whatever id it carried.
fn parse_request(body: &[u8]) -> Result<ProxyRequest, (ProxyError, Value)> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| (ProxyError::Parse(e.to_string()), Value::Null))?;
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| (ProxyError::InvalidRequest(e.to_string()), id))
}

async fn dispatch(
    executor: &dyn Executor,
    cancel: &CancellationToken,
    method: &str,
    params: Value,
) -> Result<Value, ProxyError> {
    match method {
        INIT_CHAIN => {
            let p: InitChainParams = parse_params(params)?;
            let outcome =
                executor.init_chain(cancel, p.genesis_time, p.initial_height, &p.chain_id).await?;
            to_result(outcome)
        }
        GET_TXS => to_result(executor.get_txs(cancel).await?),
        EXECUTE_TXS => {
            let p: ExecuteTxsParams = parse_params(params)?;
            let outcome = executor
                .execute_txs(cancel, p.txs, p.block_height, p.timestamp, p.prev_state_root)
                .await?;
            to_result(outcome)
        }
        SET_FINAL => {
            let p: SetFinalParams = parse_params(params)?;
            executor.set_final(cancel, p.block_height).await?;
            Ok(Value::Null)
        }
        other => Err(ProxyError::MethodNotFound(other.to_string())),
    }
}

/// Accepts either a bare params object or a single-element positional array.
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ProxyError> {
    let params = match params {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    };
    serde_json::from_value(params).map_err(|e| ProxyError::InvalidParams(e.to_string()))
}

fn to_result<T: Serialize>(value: T) -> Result<Value, ProxyError> {
    serde_json::to_value(value).map_err(|e| ProxyError::InvalidParams(e.to_string()))
}
