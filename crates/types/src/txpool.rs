use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::aliases::Address;

/// Transactions keyed by nonce, in the order the engine reported them.
pub type NonceMap<T> = IndexMap<String, T>;

/// Result of `txpool_content`.
///
/// Both subsets keep the engine's own ordering (accounts, then nonces within an
/// account); nothing is re-sorted on the way through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct TxpoolContent<T> {
    #[serde(default)]
    pub pending: IndexMap<Address, NonceMap<T>>,
    #[serde(default)]
    pub queued: IndexMap<Address, NonceMap<T>>,
}

impl<T> Default for TxpoolContent<T> {
    fn default() -> Self {
        Self { pending: IndexMap::new(), queued: IndexMap::new() }
    }
}

impl<T> TxpoolContent<T> {
    /// Iterates every transaction, pending subset first, queued second.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.pending.values().chain(self.queued.values()).flat_map(|txs| txs.values())
    }

    pub fn len(&self) -> usize {
        self.pending.values().chain(self.queued.values()).map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
