//! Behavior of the connections once the adapter has been stopped.

mod common;

use common::{GENESIS_HASH, Harness, PAYLOAD_ID, block_at, draft_payload, forkchoice_reply};
use evmbridge_execution::{
    ExecutionAdapter, ExecutionError, Executor,
    engine_api::capabilities::{
        ENGINE_EXCHANGE_CAPABILITIES, ENGINE_FORKCHOICE_UPDATED_V1, ENGINE_GET_PAYLOAD_V1,
    },
    eth_rpc::{ETH_GET_BLOCK_BY_NUMBER, TXPOOL_CONTENT},
};
use evmbridge_types::aliases::{Address, B256};
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn stopped_connections_refuse_every_call() {
    let Harness { mock, client, adapter } = Harness::new();
    mock.push_response(ENGINE_FORKCHOICE_UPDATED_V1, Ok(forkchoice_reply("VALID", Some(PAYLOAD_ID))))
        .await;
    mock.push_response(ENGINE_GET_PAYLOAD_V1, Ok(draft_payload(0xbb, json!("0x1"), json!("0x0"))))
        .await;
    mock.push_response(ETH_GET_BLOCK_BY_NUMBER, Ok(block_at(1, B256::repeat_byte(0x11)))).await;

    assert!(!client.is_closed());
    adapter.stop();
    assert!(client.is_closed());

    let reused = ExecutionAdapter::new(client, GENESIS_HASH, Address::ZERO);
    let cancel = CancellationToken::new();

    let err = reused.init_chain(&cancel, 0, 1, "test").await.unwrap_err();
    assert!(matches!(err, ExecutionError::Stopped { method: ENGINE_FORKCHOICE_UPDATED_V1 }));

    let err = reused.get_txs(&cancel).await.unwrap_err();
    assert!(matches!(err, ExecutionError::Stopped { method: TXPOOL_CONTENT }));

    let err = reused.set_final(&cancel, 1).await.unwrap_err();
    assert!(matches!(err, ExecutionError::Stopped { method: ETH_GET_BLOCK_BY_NUMBER }));

    let err = reused.check_capabilities(&cancel).await.unwrap_err();
    assert!(matches!(err, ExecutionError::Stopped { method: ENGINE_EXCHANGE_CAPABILITIES }));

    assert!(mock.requests().await.is_empty());
}
