#![allow(missing_docs)]
use std::{fmt, path::PathBuf, str::FromStr};

use evmbridge_types::aliases::{Address, B256};
use url::Url;

/// Where an RPC endpoint lives: an HTTP(S) URL or a Unix socket path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcEndpoint {
    Http(Url),
    Ipc(PathBuf),
}

impl FromStr for RpcEndpoint {
    type Err = url::ParseError;

    /// `http://` and `https://` strings are URLs, anything else is a socket path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Url::parse(s).map(Self::Http)
        } else {
            Ok(Self::Ipc(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for RpcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "Http({url})"),
            Self::Ipc(path) => write!(f, "Ipc({})", path.display()),
        }
    }
}

/// Everything the adapter needs at construction. Immutable afterwards.
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// The privileged Engine API endpoint (block building and validation).
    pub engine_endpoint: RpcEndpoint,
    /// The public chain endpoint (transaction pool, block lookups).
    pub eth_endpoint: RpcEndpoint,
    /// Shared secret for Engine API JWT auth. Only applied to HTTP engine endpoints.
    pub jwt_secret: Option<[u8; 32]>,
    /// Hash of the execution genesis block; the forkchoice anchor for `init_chain`.
    pub genesis_hash: B256,
    /// Receives the fees of every block this adapter asks the engine to build.
    pub fee_recipient: Address,
}
