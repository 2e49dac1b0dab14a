//! A mock transport for exercising the RPC clients without a live engine.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use color_eyre::eyre::{self, eyre};
use serde_json::Value;
use tokio::sync::Mutex;

use super::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Transport};

enum MockReply {
    Result(Value),
    RpcError(JsonRpcError),
    Failure(eyre::Report),
}

/// A mock transport that can be programmed with expected responses for testing.
///
/// Replies are queued per method and handed out in FIFO order. Every request that
/// reaches the mock is recorded, including ones nobody programmed a reply for.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<MockReply>>>,
    requests: Mutex<Vec<JsonRpcRequest>>,
}

impl MockTransport {
    /// Creates a new, empty mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `method`.
    ///
    /// `Ok` becomes the JSON-RPC `result`, `Err` simulates a transport failure.
    pub async fn push_response(&self, method: impl Into<String>, response: eyre::Result<Value>) {
        let reply = match response {
            Ok(value) => MockReply::Result(value),
            Err(e) => MockReply::Failure(e),
        };
        self.push(method.into(), reply).await;
    }

    /// Queues a JSON-RPC error object as the reply for `method`.
    pub async fn push_rpc_error(&self, method: impl Into<String>, code: i64, message: &str) {
        let reply = MockReply::RpcError(JsonRpcError { code, message: message.to_string() });
        self.push(method.into(), reply).await;
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<JsonRpcRequest> {
        self.requests.lock().await.clone()
    }

    /// Requests received for `method`, oldest first.
    pub async fn requests_for(&self, method: &str) -> Vec<JsonRpcRequest> {
        self.requests.lock().await.iter().filter(|r| r.method == method).cloned().collect()
    }

    async fn push(&self, method: String, reply: MockReply) {
        self.responses.lock().await.entry(method).or_default().push_back(reply);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &JsonRpcRequest) -> eyre::Result<JsonRpcResponse> {
        self.requests.lock().await.push(request.clone());

        let reply =
            self.responses.lock().await.get_mut(&request.method).and_then(VecDeque::pop_front);

        let id = Value::from(request.id);
        match reply {
            Some(MockReply::Result(result)) => Ok(JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(result),
                error: None,
            }),
            Some(MockReply::RpcError(error)) => {
                Ok(JsonRpcResponse { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) })
            }
            Some(MockReply::Failure(e)) => Err(e),
            None => Err(eyre!("MockTransport: received unexpected call to method '{}'", request.method)),
        }
    }
}
