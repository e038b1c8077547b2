//! Event listener against a local scripted WebSocket server.
//!
//! Run with:
//! ```bash
//! cargo test --test listener_integration
//! ```

mod common;

use std::time::Duration;

use tokio::time::timeout;

use common::{deposited, spawn_event_server, Reply, CREATED};
use token_launch_sdk::error::WsError;
use token_launch_sdk::ws::{AwaitIntent, EventKind, EventListener, ListenerConfig, ListenerState};

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

fn listener(url: &str) -> EventListener {
    EventListener::new(
        ListenerConfig::new(url, "0xUser").with_connect_timeout(Duration::from_secs(5)),
    )
}

#[tokio::test]
async fn test_subscribe_frame_and_socket_url() {
    let (url, server) = spawn_event_server(vec![Reply::Text(deposited(1, "0x1"))]).await;

    let mut pending = listener(&url)
        .subscribe("0xFactory", AwaitIntent::Deposit)
        .await
        .unwrap();
    assert_eq!(pending.state(), ListenerState::Waiting);
    timeout(TEST_TIMEOUT, pending.wait()).await.unwrap().unwrap();

    let log = timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
    assert_eq!(log.uri, "/?userSignature=0xUser");
    assert_eq!(
        log.subscribe.unwrap(),
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "subscribe",
            "params": [["TokenCreatedEvent", "UserDepositedEvent"], [], ["0xFactory"]]
        })
    );
}

#[tokio::test]
async fn test_first_matching_event_settles_once() {
    let (url, server) = spawn_event_server(vec![
        // A deposit await ignores token creation.
        Reply::Text(CREATED.into()),
        Reply::Text("not json".into()),
        Reply::Text(deposited(1_700_000_000, "0xfirst")),
        Reply::Text(deposited(1_700_000_001, "0xsecond")),
    ])
    .await;

    let mut pending = listener(&url)
        .subscribe("0xUser", AwaitIntent::Deposit)
        .await
        .unwrap();

    let event = timeout(TEST_TIMEOUT, pending.wait()).await.unwrap().unwrap();
    assert_eq!(event.kind, EventKind::UserDepositedEvent);
    let deposit = event.deposit().unwrap();
    assert_eq!(deposit.deposit_tx_hash, "0xfirst");
    assert_eq!(deposit.deposit_time, 1_700_000_000);
    assert_eq!(pending.state(), ListenerState::Resolved);

    // Settled: the second event can no longer be observed.
    let again = pending.wait().await;
    assert!(matches!(again, Err(WsError::Closed { code: None, .. })));
    assert_eq!(pending.state(), ListenerState::Resolved);

    let log = timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
    assert_eq!(log.client_close, Some((1000, "Client disconnect".to_string())));
}

#[tokio::test]
async fn test_deployment_intent_resolves_on_token_created() {
    let (url, server) = spawn_event_server(vec![Reply::Text(CREATED.into())]).await;

    let mut pending = listener(&url)
        .subscribe("0xFactory", AwaitIntent::Deployment)
        .await
        .unwrap();
    let event = timeout(TEST_TIMEOUT, pending.wait()).await.unwrap().unwrap();
    assert_eq!(event.kind, EventKind::TokenCreatedEvent);
    assert_eq!(event.data["tokenAddress"], "0xToken");

    timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_ping_is_answered_while_waiting() {
    let (url, server) = spawn_event_server(vec![
        Reply::Ping(b"heartbeat".to_vec()),
        Reply::Text(CREATED.into()),
    ])
    .await;

    let mut pending = listener(&url)
        .subscribe("0xFactory", AwaitIntent::Deployment)
        .await
        .unwrap();
    let event = timeout(TEST_TIMEOUT, pending.wait()).await.unwrap().unwrap();
    assert_eq!(event.kind, EventKind::TokenCreatedEvent);

    let log = timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
    assert_eq!(log.pongs, vec![b"heartbeat".to_vec()]);
    assert_eq!(log.client_close, Some((1000, "Client disconnect".to_string())));
}

#[tokio::test]
async fn test_server_close_rejects_wait() {
    let (url, server) =
        spawn_event_server(vec![Reply::Close(4000, "indexer restarting".into())]).await;

    let mut pending = listener(&url)
        .subscribe("0xUser", AwaitIntent::Deposit)
        .await
        .unwrap();
    let result = timeout(TEST_TIMEOUT, pending.wait()).await.unwrap();
    match result {
        Err(WsError::Closed { code, reason }) => {
            assert_eq!(code, Some(4000));
            assert_eq!(reason, "indexer restarting");
        }
        other => panic!("expected Closed, got {:?}", other),
    }
    assert_eq!(pending.state(), ListenerState::Closed);

    drop(pending);
    timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_cancel_settles_and_closes() {
    let (url, server) = spawn_event_server(Vec::new()).await;

    let mut pending = listener(&url)
        .subscribe("0xUser", AwaitIntent::Deposit)
        .await
        .unwrap();
    let cancel = pending.cancel_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
    });

    let result = timeout(TEST_TIMEOUT, pending.wait()).await.unwrap();
    assert!(matches!(result, Err(WsError::Cancelled)));
    assert_eq!(pending.state(), ListenerState::Closed);

    let log = timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
    assert_eq!(log.client_close, Some((1000, "Client disconnect".to_string())));
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let (url, server) = spawn_event_server(Vec::new()).await;

    let mut pending = listener(&url)
        .subscribe("0xUser", AwaitIntent::Deposit)
        .await
        .unwrap();
    pending.close().await;
    pending.close().await;
    assert_eq!(pending.state(), ListenerState::Closed);

    let log = timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
    assert!(log.client_close.is_some());
}

#[tokio::test]
async fn test_failed_submission_cancels_wait() {
    let (url, server) = spawn_event_server(Vec::new()).await;

    let mut pending = listener(&url)
        .subscribe("0xUser", AwaitIntent::Deposit)
        .await
        .unwrap();
    let (event, submitted) = timeout(
        TEST_TIMEOUT,
        pending.wait_alongside(async { Err::<String, &str>("rejected") }),
    )
    .await
    .unwrap();

    assert!(matches!(event, Err(WsError::Cancelled)));
    assert_eq!(submitted, Err("rejected"));

    timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_submission_and_event_both_complete() {
    let (url, server) = spawn_event_server(vec![Reply::Text(deposited(5, "0xabc"))]).await;

    let mut pending = listener(&url)
        .subscribe("0xUser", AwaitIntent::Deposit)
        .await
        .unwrap();
    let (event, submitted) = timeout(
        TEST_TIMEOUT,
        pending.wait_alongside(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, ()>("0xabc")
        }),
    )
    .await
    .unwrap();

    assert_eq!(event.unwrap().deposit().unwrap().deposit_tx_hash, "0xabc");
    assert_eq!(submitted, Ok("0xabc"));

    timeout(TEST_TIMEOUT, server).await.unwrap().unwrap();
}
