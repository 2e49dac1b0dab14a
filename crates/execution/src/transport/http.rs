// crates/execution/src/transport/http.rs

use async_trait::async_trait;
use color_eyre::eyre;
use reqwest::Client;
use url::Url;

use super::{JsonRpcRequest, JsonRpcResponse, Transport};
use crate::engine_api::jwt::JwtProvider;

/// JSON-RPC over HTTP, optionally authenticated with an Engine API JWT.
pub struct HttpTransport {
    client: Client,
    url: Url,
    jwt_provider: Option<JwtProvider>,
}

impl HttpTransport {
    /// Builds the underlying connection pool. No request is sent.
    pub fn new(url: Url) -> eyre::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, url, jwt_provider: None })
    }

    pub fn with_jwt(mut self, secret: [u8; 32]) -> Self {
        self.jwt_provider = Some(JwtProvider::new(secret));
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &JsonRpcRequest) -> eyre::Result<JsonRpcResponse> {
        let mut req_builder = self.client.post(self.url.clone()).json(request);

        if let Some(provider) = &self.jwt_provider {
            let token = provider.get_token().await?;
            req_builder = req_builder.bearer_auth(token);
        }

        let response = req_builder.send().await?.error_for_status()?;
        let response_bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&response_bytes)?)
    }
}
