//! Block execution: build, inject, submit.

mod common;

use common::{FEE_RECIPIENT, Harness, PAYLOAD_ID, draft_payload, forkchoice_reply, status_reply};
use evmbridge_execution::{
    ExecutionError, Executor,
    engine_api::capabilities::{
        ENGINE_FORKCHOICE_UPDATED_V1, ENGINE_GET_PAYLOAD_V1, ENGINE_NEW_PAYLOAD_V1,
    },
};
use evmbridge_types::{Hash, Tx, engine_api::derive_prev_randao};
use serde_json::json;
use tokio_util::sync::CancellationToken;

const PREV_ROOT: Hash = Hash::repeat_byte(0x33);

async fn scripted_build(h: &Harness) {
    h.reply(ENGINE_FORKCHOICE_UPDATED_V1, forkchoice_reply("VALID", Some(PAYLOAD_ID))).await;
    h.reply(ENGINE_GET_PAYLOAD_V1, draft_payload(0xcc, json!("0x1c9c380"), json!("0x5208"))).await;
}

#[tokio::test]
async fn reports_pre_injection_draft_values() -> color_eyre::Result<()> {
    let h = Harness::new();
    scripted_build(&h).await;
    h.reply(ENGINE_NEW_PAYLOAD_V1, status_reply("VALID")).await;

    let txs = vec![Tx::from_static(&[0xde, 0xad]), Tx::from_static(&[0xbe, 0xef])];
    let outcome =
        h.adapter.execute_txs(&CancellationToken::new(), txs, 42, 1_700_000_042, PREV_ROOT).await?;

    assert_eq!(outcome.state_root, Hash::repeat_byte(0xcc));
    assert_eq!(outcome.gas_used, 21_000);

    assert_eq!(
        h.call_log().await,
        [ENGINE_FORKCHOICE_UPDATED_V1, ENGINE_GET_PAYLOAD_V1, ENGINE_NEW_PAYLOAD_V1]
    );

    let submitted = &h.sent(ENGINE_NEW_PAYLOAD_V1).await[0].params[0];
    assert_eq!(submitted["transactions"], json!(["0xdead", "0xbeef"]));
    assert_eq!(submitted["stateRoot"], json!(Hash::repeat_byte(0xcc)));
    assert_eq!(submitted["gasUsed"], json!("0x5208"));
    assert_eq!(submitted["extraData"], json!("0x"));
    assert_eq!(submitted["baseFeePerGas"], json!("0x7"));
    Ok(())
}

#[tokio::test]
async fn builds_on_previous_root_with_height_randao() -> color_eyre::Result<()> {
    let h = Harness::new();
    scripted_build(&h).await;
    h.reply(ENGINE_NEW_PAYLOAD_V1, status_reply("VALID")).await;

    h.adapter.execute_txs(&CancellationToken::new(), vec![], 0x0102, 100, PREV_ROOT).await?;

    let fcu = &h.sent(ENGINE_FORKCHOICE_UPDATED_V1).await[0];
    assert_eq!(fcu.params[0]["headBlockHash"], json!(PREV_ROOT));
    assert_eq!(fcu.params[0]["finalizedBlockHash"], json!(PREV_ROOT));
    assert_eq!(fcu.params[1]["timestamp"], json!("0x64"));
    assert_eq!(fcu.params[1]["prevRandao"], json!(derive_prev_randao(0x0102)));
    assert_eq!(
        fcu.params[1]["prevRandao"],
        json!(format!("0x{}0102", "0".repeat(60)))
    );
    assert_eq!(fcu.params[1]["suggestedFeeRecipient"], json!(FEE_RECIPIENT));

    let submitted = &h.sent(ENGINE_NEW_PAYLOAD_V1).await[0].params[0];
    assert_eq!(submitted["transactions"], json!([]));
    Ok(())
}

#[tokio::test]
async fn syncing_engine_rejects_execution() {
    let h = Harness::new();
    scripted_build(&h).await;
    h.reply(ENGINE_NEW_PAYLOAD_V1, status_reply("SYNCING")).await;

    let err = h
        .adapter
        .execute_txs(&CancellationToken::new(), vec![], 1, 1, PREV_ROOT)
        .await
        .unwrap_err();

    match err {
        ExecutionError::InvalidPayloadStatus { method, status } => {
            assert_eq!(method, ENGINE_NEW_PAYLOAD_V1);
            assert_eq!(status.as_deref(), Some("SYNCING"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_status_is_not_valid() {
    let h = Harness::new();
    scripted_build(&h).await;
    h.reply(ENGINE_NEW_PAYLOAD_V1, json!({})).await;

    let err = h
        .adapter
        .execute_txs(&CancellationToken::new(), vec![], 1, 1, PREV_ROOT)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::InvalidPayloadStatus { method: ENGINE_NEW_PAYLOAD_V1, status: None }
    ));
}

#[tokio::test]
async fn missing_gas_used_fails_before_submission() {
    let h = Harness::new();
    h.reply(ENGINE_FORKCHOICE_UPDATED_V1, forkchoice_reply("VALID", Some(PAYLOAD_ID))).await;
    h.reply(ENGINE_GET_PAYLOAD_V1, json!({ "stateRoot": Hash::repeat_byte(0xcc) })).await;

    let err = h
        .adapter
        .execute_txs(&CancellationToken::new(), vec![], 1, 1, PREV_ROOT)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::MalformedPayload { method: ENGINE_GET_PAYLOAD_V1, .. }));
    assert!(h.sent(ENGINE_NEW_PAYLOAD_V1).await.is_empty());
}

#[tokio::test]
async fn missing_payload_id_aborts_execution() {
    let h = Harness::new();
    h.reply(ENGINE_FORKCHOICE_UPDATED_V1, forkchoice_reply("SYNCING", None)).await;

    let err = h
        .adapter
        .execute_txs(&CancellationToken::new(), vec![], 1, 1, PREV_ROOT)
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::MissingPayloadId { .. }));
    assert_eq!(h.call_log().await, [ENGINE_FORKCHOICE_UPDATED_V1]);
}

#[tokio::test]
async fn cancelled_token_stops_before_any_request() {
    let h = Harness::new();
    scripted_build(&h).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = h.adapter.execute_txs(&cancel, vec![], 1, 1, PREV_ROOT).await.unwrap_err();

    assert!(matches!(err, ExecutionError::Cancelled { method: ENGINE_FORKCHOICE_UPDATED_V1 }));
    assert!(h.mock.requests().await.is_empty());
}
