#![allow(missing_docs)]
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use color_eyre::eyre;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
};

use super::{JsonRpcRequest, JsonRpcResponse, Transport};

// Bounds each socket step (connect, write, read), not the engine's work on the request.
const IO_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC over a Unix domain socket, one connection per request.
pub struct IpcTransport {
    path: PathBuf,
}

impl IpcTransport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Dials the socket once and drops the connection.
    pub async fn probe(&self) -> eyre::Result<()> {
        let stream = self.connect().await?;
        drop(stream);
        Ok(())
    }

    async fn connect(&self) -> eyre::Result<UnixStream> {
        let stream_future = UnixStream::connect(&self.path);
        let stream = tokio::time::timeout(IO_TIMEOUT, stream_future).await??;
        Ok(stream)
    }
}

#[async_trait]
impl Transport for IpcTransport {
    async fn send(&self, req: &JsonRpcRequest) -> eyre::Result<JsonRpcResponse> {
        // Half-close after writing so the server answers and closes its side;
        // the full response is then everything up to EOF.
        let mut stream = self.connect().await?;

        let req_bytes = serde_json::to_vec(req)?;
        tokio::time::timeout(IO_TIMEOUT, stream.write_all(&req_bytes)).await??;
        tokio::time::timeout(IO_TIMEOUT, stream.shutdown()).await??;

        let mut resp_bytes = Vec::new();
        tokio::time::timeout(IO_TIMEOUT, stream.read_to_end(&mut resp_bytes)).await??;

        serde_json::from_slice(&resp_bytes).map_err(|e| e.into())
    }
}
