//! Engine API wire types.
//!
//! Responses coming back from the execution engine are modelled with explicit
//! optional fields. A field that is absent deserializes to `None`; a field that
//! is present but mistyped fails deserialization. Callers decide which of the
//! two is fatal for the call at hand.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::aliases::{B256, BlockHash, BlockNumber, Bytes, U256};

/// Returns the `prevRandao` payload attribute used when building the block at `height`.
///
/// The value is the big-endian encoding of `height`, zero-padded to 32 bytes. It is
/// a deterministic stand-in for beacon randomness: re-executing a height always
/// yields the same value, and it carries no unpredictability at all.
pub fn derive_prev_randao(height: BlockNumber) -> B256 {
    B256::from(U256::from(height))
}

/// An unsigned 64-bit Engine API quantity.
///
/// Engines encode quantities as `0x`-prefixed hex strings; some test engines and
/// proxies send bare JSON numbers instead. Both are accepted, hex is always emitted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(pub u64);

impl From<Quantity> for u64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_utils::u64_hex_be::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct QuantityVisitor;

        impl de::Visitor<'_> for QuantityVisitor {
            type Value = Quantity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a hex quantity string or an unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
                Ok(Quantity(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
                u64::try_from(v).map(Quantity).map_err(|_| E::custom("negative quantity"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
                if v.fract() == 0.0 && v >= 0.0 && v < u64::MAX as f64 {
                    Ok(Quantity(v as u64))
                } else {
                    Err(E::custom(format!("quantity {v} is not an unsigned integer")))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
                let digits = v
                    .strip_prefix("0x")
                    .ok_or_else(|| E::custom(format!("quantity {v:?} is missing 0x prefix")))?;
                if digits.is_empty() {
                    return Err(E::custom("empty hex quantity"));
                }
                u64::from_str_radix(digits, 16)
                    .map(Quantity)
                    .map_err(|e| E::custom(format!("invalid hex quantity {v:?}: {e}")))
            }
        }

        deserializer.deserialize_any(QuantityVisitor)
    }
}

/// Engine-assigned identifier correlating a payload build request with its retrieval.
///
/// Deliberately not `Clone`: a handle is redeemed by value, exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct PayloadHandle(String);

impl PayloadHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayloadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for PayloadHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadStatusKind {
    Valid,
    Invalid,
    Syncing,
    Accepted,
    InvalidBlockHash,
}

impl PayloadStatusKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Syncing => "SYNCING",
            Self::Accepted => "ACCEPTED",
            Self::InvalidBlockHash => "INVALID_BLOCK_HASH",
        }
    }

    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for PayloadStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownPayloadStatus(pub String);

impl fmt::Display for UnknownPayloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown payload status {:?}", self.0)
    }
}

impl std::error::Error for UnknownPayloadStatus {}

impl FromStr for PayloadStatusKind {
    type Err = UnknownPayloadStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VALID" => Ok(Self::Valid),
            "INVALID" => Ok(Self::Invalid),
            "SYNCING" => Ok(Self::Syncing),
            "ACCEPTED" => Ok(Self::Accepted),
            "INVALID_BLOCK_HASH" => Ok(Self::InvalidBlockHash),
            other => Err(UnknownPayloadStatus(other.to_string())),
        }
    }
}

/// `PayloadStatusV1`, as returned by `engine_newPayloadV1` and nested in forkchoice responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadStatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub latest_valid_hash: Option<BlockHash>,
    #[serde(default)]
    pub validation_error: Option<String>,
}

impl PayloadStatusResponse {
    /// Parses the status string. `None` when absent or not a known status.
    pub fn kind(&self) -> Option<PayloadStatusKind> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

/// `ForkchoiceUpdatedResponseV1`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkchoiceResponse {
    #[serde(default)]
    pub payload_status: Option<PayloadStatusResponse>,
    #[serde(default)]
    pub payload_id: Option<String>,
}

impl ForkchoiceResponse {
    /// Takes the build handle out of the response, if the engine assigned one.
    pub fn into_payload_handle(self) -> Option<PayloadHandle> {
        self.payload_id.map(PayloadHandle)
    }
}

/// Candidate block returned by `engine_getPayloadV1`.
///
/// Only the fields the adapter reads or rewrites are typed; everything else is
/// carried through untouched in `other` so the payload can be resubmitted with
/// `engine_newPayloadV1`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_root: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Bytes>>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl DraftPayload {
    /// Replaces whatever transactions the engine proposed with `txs`.
    pub fn with_transactions(mut self, txs: Vec<Bytes>) -> Self {
        self.transactions = Some(txs);
        self
    }
}

/// The subset of an `eth_getBlockByNumber` result the adapter reads.
///
/// Only the hash is required; every other block field is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionBlock {
    #[serde(rename = "hash")]
    pub block_hash: BlockHash,

    #[serde(rename = "number", default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<Quantity>,
}
