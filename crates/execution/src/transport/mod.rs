// crates/execution/src/transport/mod.rs
#![allow(missing_docs)]

pub mod http;
pub mod ipc;
pub mod mock;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use color_eyre::eyre;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ExecutionError;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// A generic transport for sending JSON-RPC requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a JSON-RPC request and returns the response.
    async fn send(&self, req: &JsonRpcRequest) -> eyre::Result<JsonRpcResponse>;
}

/// Represents a JSON-RPC request object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// Represents a JSON-RPC response object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Value,
}

/// Represents a JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

/// Sends `method` over `transport` and unwraps the JSON-RPC envelope.
///
/// A `null` or absent `result` is returned as `Value::Null`; whether that is an
/// error depends on the method, so decoding is left to the caller.
pub(crate) async fn call(
    transport: &dyn Transport,
    method: &'static str,
    params: Value,
) -> Result<Value, ExecutionError> {
    let req = JsonRpcRequest::new(method, params);

    let resp = transport
        .send(&req)
        .await
        .map_err(|e| ExecutionError::Transport { method, reason: format!("{e:#}") })?;

    if let Some(err) = resp.error {
        return Err(ExecutionError::JsonRpc { method, code: err.code, message: err.message });
    }

    Ok(resp.result.unwrap_or(Value::Null))
}
