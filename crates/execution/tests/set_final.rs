//! Finalization by height.

mod common;

use common::{Harness, block_at, forkchoice_reply};
use evmbridge_execution::{
    ExecutionError, Executor, engine_api::capabilities::ENGINE_FORKCHOICE_UPDATED_V1,
    eth_rpc::ETH_GET_BLOCK_BY_NUMBER,
};
use evmbridge_types::aliases::B256;
use serde_json::json;
use tokio_util::sync::CancellationToken;

const BLOCK_HASH: B256 = B256::repeat_byte(0x22);

#[tokio::test]
async fn finalizes_the_block_at_height() -> color_eyre::Result<()> {
    let h = Harness::new();
    h.reply(ETH_GET_BLOCK_BY_NUMBER, block_at(26, BLOCK_HASH)).await;
    h.reply(ENGINE_FORKCHOICE_UPDATED_V1, forkchoice_reply("VALID", None)).await;

    h.adapter.set_final(&CancellationToken::new(), 26).await?;

    assert_eq!(h.call_log().await, [ETH_GET_BLOCK_BY_NUMBER, ENGINE_FORKCHOICE_UPDATED_V1]);
    assert_eq!(h.sent(ETH_GET_BLOCK_BY_NUMBER).await[0].params, json!(["0x1a", false]));

    let fcu = &h.sent(ENGINE_FORKCHOICE_UPDATED_V1).await[0];
    assert_eq!(
        fcu.params,
        json!([
            {
                "headBlockHash": BLOCK_HASH,
                "safeBlockHash": BLOCK_HASH,
                "finalizedBlockHash": BLOCK_HASH,
            },
            null
        ])
    );
    Ok(())
}

#[tokio::test]
async fn block_with_only_a_hash_is_enough() -> color_eyre::Result<()> {
    let h = Harness::new();
    h.reply(ETH_GET_BLOCK_BY_NUMBER, json!({ "hash": BLOCK_HASH })).await;
    h.reply(ENGINE_FORKCHOICE_UPDATED_V1, forkchoice_reply("VALID", None)).await;

    h.adapter.set_final(&CancellationToken::new(), 26).await?;

    let fcu = &h.sent(ENGINE_FORKCHOICE_UPDATED_V1).await[0];
    assert_eq!(fcu.params[0]["finalizedBlockHash"], json!(BLOCK_HASH));
    Ok(())
}

#[tokio::test]
async fn unknown_height_never_reaches_the_engine() {
    let h = Harness::new();
    h.reply(ETH_GET_BLOCK_BY_NUMBER, json!(null)).await;

    let err = h.adapter.set_final(&CancellationToken::new(), 999).await.unwrap_err();

    assert!(matches!(err, ExecutionError::BlockNotFound { height: 999 }));
    assert!(h.sent(ENGINE_FORKCHOICE_UPDATED_V1).await.is_empty());
}

#[tokio::test]
async fn missing_payload_status_wrapper() {
    let h = Harness::new();
    h.reply(ETH_GET_BLOCK_BY_NUMBER, block_at(3, BLOCK_HASH)).await;
    h.reply(ENGINE_FORKCHOICE_UPDATED_V1, json!({ "payloadId": null })).await;

    let err = h.adapter.set_final(&CancellationToken::new(), 3).await.unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::MissingPayloadStatus { method: ENGINE_FORKCHOICE_UPDATED_V1 }
    ));
}

#[tokio::test]
async fn invalid_forkchoice_is_rejected() {
    let h = Harness::new();
    h.reply(ETH_GET_BLOCK_BY_NUMBER, block_at(3, BLOCK_HASH)).await;
    h.reply(ENGINE_FORKCHOICE_UPDATED_V1, forkchoice_reply("INVALID", None)).await;

    let err = h.adapter.set_final(&CancellationToken::new(), 3).await.unwrap_err();
    match err {
        ExecutionError::InvalidPayloadStatus { method, status } => {
            assert_eq!(method, ENGINE_FORKCHOICE_UPDATED_V1);
            assert_eq!(status.as_deref(), Some("INVALID"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn block_lookup_transport_failure() {
    let h = Harness::new();
    h.mock
        .push_response(ETH_GET_BLOCK_BY_NUMBER, Err(color_eyre::eyre::eyre!("connection refused")))
        .await;

    let err = h.adapter.set_final(&CancellationToken::new(), 3).await.unwrap_err();
    assert!(matches!(err, ExecutionError::Transport { method: ETH_GET_BLOCK_BY_NUMBER, .. }));
}
