use core::fmt;

use serde::{Deserialize, Serialize};

use crate::aliases::{B256, BlockHash, Bytes};

/// Opaque transaction as handed to and from the driver.
///
/// The bytes are the engine-native serialized form of one transaction and are
/// never interpreted by the adapter.
pub type Tx = Bytes;

/// Opaque 32-byte identifier the driver uses for state roots and block hashes.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash(B256);

impl Hash {
    pub const LENGTH: usize = 32;

    pub const ZERO: Self = Self(B256::ZERO);

    pub const fn new(value: [u8; Self::LENGTH]) -> Self {
        Self(B256::new(value))
    }

    /// Creates a hash where every byte is set to `byte`.
    #[inline]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self(B256::repeat_byte(byte))
    }

    /// Reinterprets the opaque hash as an engine-native block hash.
    pub const fn into_block_hash(self) -> BlockHash {
        self.0
    }
}

impl From<B256> for Hash {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<[u8; Hash::LENGTH]> for Hash {
    fn from(value: [u8; Hash::LENGTH]) -> Self {
        Self::new(value)
    }
}

impl From<Hash> for B256 {
    fn from(value: Hash) -> Self {
        value.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}
