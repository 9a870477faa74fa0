use crate::{BroadcastMessage, ShutdownCoordinator, Take, WsError, message_queue};

use tokio::time::{Duration, timeout};

#[tokio::test]
async fn given_queued_messages_when_take_then_fifo_order() {
    let (sender, mut queue) = message_queue(8);
    let coordinator = ShutdownCoordinator::new();
    let mut guard = coordinator.subscribe_guard();

    sender.send("first").await.unwrap();
    sender.send(String::from("second")).await.unwrap();

    assert_eq!(
        queue.take(&mut guard).await.unwrap(),
        Take::Message(BroadcastMessage::from("first"))
    );
    assert_eq!(
        queue.take(&mut guard).await.unwrap(),
        Take::Message(BroadcastMessage::from("second"))
    );
}

#[tokio::test]
async fn given_empty_queue_when_shutdown_during_take_then_cancelled_promptly() {
    let (_sender, mut queue) = message_queue(8);
    let coordinator = ShutdownCoordinator::new();
    let mut guard = coordinator.subscribe_guard();

    let trigger = coordinator.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.shutdown();
    });

    let result = timeout(Duration::from_secs(1), queue.take(&mut guard)).await;

    assert_eq!(result.expect("take should unblock").unwrap(), Take::Cancelled);
}

#[tokio::test]
async fn given_pending_messages_and_shutdown_when_take_then_cancellation_wins() {
    let (sender, mut queue) = message_queue(8);
    let coordinator = ShutdownCoordinator::new();
    let mut guard = coordinator.subscribe_guard();

    sender.send("never delivered").await.unwrap();
    coordinator.shutdown();

    assert_eq!(queue.take(&mut guard).await.unwrap(), Take::Cancelled);
}

#[tokio::test]
async fn given_all_senders_dropped_when_take_then_drains_then_queue_closed() {
    let (sender, mut queue) = message_queue(8);
    let coordinator = ShutdownCoordinator::new();
    let mut guard = coordinator.subscribe_guard();

    sender.send("last words").await.unwrap();
    drop(sender);

    assert_eq!(
        queue.take(&mut guard).await.unwrap(),
        Take::Message(BroadcastMessage::from("last words"))
    );
    assert!(matches!(
        queue.take(&mut guard).await,
        Err(WsError::QueueClosed { .. })
    ));
}

#[tokio::test]
async fn given_full_queue_when_try_send_then_queue_full() {
    let (sender, _queue) = message_queue(1);

    sender.try_send("fits").unwrap();
    let result = sender.try_send("overflow");

    assert!(matches!(result, Err(WsError::QueueFull { .. })));
}

#[tokio::test]
async fn given_queue_dropped_when_send_then_queue_closed() {
    let (sender, queue) = message_queue(4);
    drop(queue);

    assert!(sender.is_closed());
    assert!(matches!(
        sender.send("orphan").await,
        Err(WsError::QueueClosed { .. })
    ));
}

#[tokio::test]
async fn given_queue_dropped_when_send_then_error_names_calling_site() {
    let (sender, queue) = message_queue(4);
    drop(queue);

    let pending = sender.send("orphan");
    let error = pending.await.unwrap_err();

    let WsError::QueueClosed { location } = &error else {
        panic!("expected QueueClosed, got {error:?}");
    };
    assert!(location.file.ends_with("tests/message_queue.rs"));
    assert!(error.to_string().contains(&location.to_string()));
}

#[tokio::test]
async fn given_senders_dropped_when_take_then_error_names_calling_site() {
    let (sender, mut queue) = message_queue(4);
    let coordinator = ShutdownCoordinator::new();
    let mut guard = coordinator.subscribe_guard();
    drop(sender);

    let error = queue.take(&mut guard).await.unwrap_err();

    let WsError::QueueClosed { location } = &error else {
        panic!("expected QueueClosed, got {error:?}");
    };
    assert!(location.file.ends_with("tests/message_queue.rs"));
}

#[test]
fn given_zero_capacity_when_created_then_still_usable() {
    let (sender, _queue) = message_queue(0);

    assert!(sender.try_send("one").is_ok());
}
