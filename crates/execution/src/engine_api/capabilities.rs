// crates/execution/src/engine_api/capabilities.rs

use std::collections::HashSet;

pub const ENGINE_NEW_PAYLOAD_V1: &str = "engine_newPayloadV1";
pub const ENGINE_GET_PAYLOAD_V1: &str = "engine_getPayloadV1";
pub const ENGINE_FORKCHOICE_UPDATED_V1: &str = "engine_forkchoiceUpdatedV1";
pub const ENGINE_EXCHANGE_CAPABILITIES: &str = "engine_exchangeCapabilities";

// Engine API methods this adapter calls
pub static ADAPTER_CAPABILITIES: &[&str] =
    &[ENGINE_FORKCHOICE_UPDATED_V1, ENGINE_GET_PAYLOAD_V1, ENGINE_NEW_PAYLOAD_V1];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineCapabilities {
    pub forkchoice_updated_v1: bool,
    pub get_payload_v1: bool,
    pub new_payload_v1: bool,
}

impl EngineCapabilities {
    pub fn from_response_strings(capabilities: HashSet<String>) -> Self {
        Self {
            forkchoice_updated_v1: capabilities.contains(ENGINE_FORKCHOICE_UPDATED_V1),
            get_payload_v1: capabilities.contains(ENGINE_GET_PAYLOAD_V1),
            new_payload_v1: capabilities.contains(ENGINE_NEW_PAYLOAD_V1),
        }
    }

    /// Methods the adapter needs that the engine did not advertise.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.forkchoice_updated_v1, ENGINE_FORKCHOICE_UPDATED_V1),
            (self.get_payload_v1, ENGINE_GET_PAYLOAD_V1),
            (self.new_payload_v1, ENGINE_NEW_PAYLOAD_V1),
        ]
        .into_iter()
        .filter_map(|(supported, method)| (!supported).then_some(method))
        .collect()
    }
}
