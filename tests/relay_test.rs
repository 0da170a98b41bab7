use chrono::{Duration, Utc};
use kisansetu_tracking::clients::RelayClient;
use kisansetu_tracking::model::{DeliveryId, DeliveryLocationUpdate, DeliveryStatus};
use kisansetu_tracking::relay::{self, RelayError, RelayStats};
use tokio::sync::broadcast::error::RecvError;

fn start(room_capacity: usize) -> (RelayClient, tokio::task::JoinHandle<()>) {
    let (actor, client) = relay::new(16, room_capacity, 8);
    let handle = tokio::spawn(actor.run());
    (client, handle)
}

fn at(delivery: u32, lat: f64, seconds_ago: i64) -> DeliveryLocationUpdate {
    DeliveryLocationUpdate {
        delivery_id: DeliveryId(delivery),
        lat,
        lng: 75.86,
        status: DeliveryStatus::InTransit,
        timestamp: Some(Utc::now() - Duration::seconds(seconds_ago)),
    }
}

#[tokio::test]
async fn older_updates_are_dropped() {
    let (relay, _handle) = start(8);
    let mut watcher = relay.join(DeliveryId(1)).await.unwrap();

    assert_eq!(relay.publish(at(1, 22.71, 10)).await.unwrap(), 1);
    let stale = relay.publish(at(1, 22.70, 60)).await;
    assert!(matches!(
        stale,
        Err(RelayError::Stale { delivery_id: DeliveryId(1), .. })
    ));

    // Ordering is per room.
    let mut other = relay.join(DeliveryId(2)).await.unwrap();
    assert_eq!(relay.publish(at(2, 22.69, 60)).await.unwrap(), 1);

    assert_eq!(watcher.recv().await.unwrap().lat, 22.71);
    assert!(watcher.try_recv().is_err());
    assert_eq!(other.recv().await.unwrap().lat, 22.69);
}

#[tokio::test]
async fn future_stamps_are_taken_as_now() {
    let (relay, _handle) = start(8);
    let mut watcher = relay.join(DeliveryId(1)).await.unwrap();

    // A sender clock an hour ahead.
    assert_eq!(relay.publish(at(1, 22.71, -3600)).await.unwrap(), 1);
    let mut unstamped = at(1, 22.72, 0);
    unstamped.timestamp = None;
    assert_eq!(relay.publish(unstamped).await.unwrap(), 1);

    let first = watcher.recv().await.unwrap();
    assert!(first.timestamp.unwrap() <= Utc::now());
    let second = watcher.recv().await.unwrap();
    assert_eq!(second.lat, 22.72);
    assert!(second.timestamp >= first.timestamp);
}

#[tokio::test]
async fn publishing_to_an_empty_room_is_not_an_error() {
    let (relay, _handle) = start(8);
    assert_eq!(relay.publish(at(5, 22.7, 0)).await.unwrap(), 0);
    assert_eq!(relay.stats().await.unwrap().rooms, 0);
}

#[tokio::test]
async fn abandoned_rooms_are_pruned() {
    let (relay, _handle) = start(8);
    let first = relay.join(DeliveryId(1)).await.unwrap();
    let _second = relay.join(DeliveryId(2)).await.unwrap();
    assert_eq!(relay.stats().await.unwrap().rooms, 2);

    drop(first);
    // Joining any room sweeps the empty ones.
    let _third = relay.join(DeliveryId(3)).await.unwrap();
    assert_eq!(
        relay.stats().await.unwrap(),
        RelayStats {
            rooms: 2,
            watchers: 2,
            chat_subscribers: 0,
        }
    );
}

#[tokio::test]
async fn slow_watcher_skips_to_the_newest() {
    let (relay, _handle) = start(2);
    let mut watcher = relay.join(DeliveryId(1)).await.unwrap();

    for (i, lat) in [22.70, 22.71, 22.72, 22.73].into_iter().enumerate() {
        relay.publish(at(1, lat, 40 - i as i64)).await.unwrap();
    }

    assert!(matches!(watcher.recv().await, Err(RecvError::Lagged(2))));
    assert_eq!(watcher.recv().await.unwrap().lat, 22.72);
    assert_eq!(watcher.recv().await.unwrap().lat, 22.73);
}

#[tokio::test]
async fn chat_is_relayed_verbatim() {
    let (relay, _handle) = start(8);
    let mut subscriber = relay.subscribe_chat().await.unwrap();
    let message = serde_json::json!({"deliveryId": "delivery_1", "text": "At the gate"});

    assert_eq!(relay.send_chat(message.clone()).await.unwrap(), 1);
    assert_eq!(subscriber.recv().await.unwrap(), message);
}

#[tokio::test]
async fn shutdown_ends_subscriptions_while_clients_remain() {
    let (relay, handle) = start(8);
    let mut watcher = relay.join(DeliveryId(1)).await.unwrap();
    let mut chat = relay.subscribe_chat().await.unwrap();
    let still_held = relay.clone();

    relay.shutdown().await;
    handle.await.unwrap();

    assert!(matches!(watcher.recv().await, Err(RecvError::Closed)));
    assert!(matches!(chat.recv().await, Err(RecvError::Closed)));
    assert!(matches!(
        still_held.stats().await,
        Err(RelayError::Unavailable)
    ));
}
