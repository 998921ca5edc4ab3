use super::*;
use std::time::Duration;

#[tokio::test]
async fn cancelled_resolves_after_cancel() {
    let handle = CancelHandle::new();
    let waiter = handle.clone();
    let task = tokio::spawn(async move {
        waiter.cancelled().await;
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.cancel();
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn cancelled_resolves_immediately_if_already_cancelled() {
    let handle = CancelHandle::new();
    handle.cancel();
    tokio::time::timeout(Duration::from_millis(100), handle.cancelled())
        .await
        .unwrap();
}

#[test]
fn is_cancelled_reflects_state() {
    let handle = CancelHandle::new();
    assert!(!handle.is_cancelled());
    handle.cancel();
    assert!(handle.is_cancelled());
}
