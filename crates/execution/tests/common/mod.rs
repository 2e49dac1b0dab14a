//! Shared fixtures for the adapter integration tests.
//!
//! Every test drives a real [`ExecutionAdapter`] whose engine and chain clients
//! share one [`MockTransport`], so the full request log of a call can be
//! inspected in order.

#![allow(dead_code)]

use std::sync::Arc;

use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy, transaction::Recovered};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Signature, TxKind};
use alloy_rpc_types_eth::Transaction;
use evmbridge_execution::{
    ExecutionAdapter, ExecutionClient,
    engine_api::client::EngineApiClient,
    eth_rpc::client::EthRpcClient,
    transport::{JsonRpcRequest, mock::MockTransport},
};
use evmbridge_types::aliases::{Address, B256, Bytes, U256};
use serde_json::{Value, json};

pub(crate) const GENESIS_HASH: B256 = B256::repeat_byte(0xaa);
pub(crate) const FEE_RECIPIENT: Address = Address::repeat_byte(0xfe);
pub(crate) const PAYLOAD_ID: &str = "0x1";

pub(crate) struct Harness {
    pub mock: Arc<MockTransport>,
    /// A second handle on the connections the adapter uses.
    pub client: ExecutionClient,
    pub adapter: ExecutionAdapter,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_fee_recipient(FEE_RECIPIENT)
    }

    pub(crate) fn with_fee_recipient(fee_recipient: Address) -> Self {
        let mock = Arc::new(MockTransport::new());
        let client = ExecutionClient::from_parts(
            Arc::new(EngineApiClient::from_shared(mock.clone())),
            Arc::new(EthRpcClient::from_shared(mock.clone())),
        );
        let adapter = ExecutionAdapter::new(client.clone(), GENESIS_HASH, fee_recipient);
        Self { mock, client, adapter }
    }

    pub(crate) async fn reply(&self, method: &str, result: Value) {
        self.mock.push_response(method, Ok(result)).await;
    }

    pub(crate) async fn sent(&self, method: &str) -> Vec<JsonRpcRequest> {
        self.mock.requests_for(method).await
    }

    /// Method names of every request issued so far, in order.
    pub(crate) async fn call_log(&self) -> Vec<String> {
        self.mock.requests().await.into_iter().map(|r| r.method).collect()
    }
}

pub(crate) fn hex32(byte: u8) -> String {
    format!("0x{}", format!("{byte:02x}").repeat(32))
}

pub(crate) fn forkchoice_reply(status: &str, payload_id: Option<&str>) -> Value {
    json!({
        "payloadStatus": { "status": status, "latestValidHash": null, "validationError": null },
        "payloadId": payload_id,
    })
}

pub(crate) fn status_reply(status: &str) -> Value {
    json!({ "status": status, "latestValidHash": null, "validationError": null })
}

/// A `getPayloadV1` result with the fields an engine would normally fill in.
pub(crate) fn draft_payload(state_root: u8, gas_limit: Value, gas_used: Value) -> Value {
    json!({
        "parentHash": hex32(0xaa),
        "feeRecipient": format!("{FEE_RECIPIENT}"),
        "stateRoot": hex32(state_root),
        "receiptsRoot": hex32(0x01),
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "prevRandao": hex32(0x00),
        "blockNumber": "0x1",
        "gasLimit": gas_limit,
        "gasUsed": gas_used,
        "timestamp": "0x64",
        "extraData": "0x",
        "baseFeePerGas": "0x7",
        "blockHash": hex32(0x02),
        "transactions": ["0x99"],
    })
}

pub(crate) fn block_at(number: u64, hash: B256) -> Value {
    json!({
        "hash": hash,
        "number": format!("{number:#x}"),
        "parentHash": B256::repeat_byte(0x21),
        "timestamp": format!("{:#x}", 1_700_000_000 + number),
        "mixHash": B256::ZERO,
        "transactions": [],
    })
}

/// A signed legacy transfer as the pool reports it, plus its EIP-2718 encoding.
pub(crate) fn pool_tx(nonce: u64, from: Address) -> (Value, Bytes) {
    let tx = TxLegacy {
        chain_id: Some(1),
        nonce,
        gas_price: 1_000_000_000,
        gas_limit: 21_000,
        to: TxKind::Call(Address::repeat_byte(0x77)),
        value: U256::from(nonce + 1),
        input: Bytes::new(),
    };
    let signature = Signature::new(U256::from(nonce + 1), U256::from(2u64), false);
    let envelope = TxEnvelope::Legacy(tx.into_signed(signature));
    let encoded = Bytes::from(envelope.encoded_2718());

    let rpc_tx = Transaction {
        inner: Recovered::new_unchecked(envelope, from),
        block_hash: None,
        block_number: None,
        transaction_index: None,
        effective_gas_price: None,
    };
    (serde_json::to_value(rpc_tx).expect("transaction serializes"), encoded)
}
