//! # Live Tracking Socket
//!
//! `GET /ws` upgrades to a WebSocket speaking JSON text frames of the form
//! `{"event": <name>, "data": <payload>}`.
//!
//! | Direction | Event | Data |
//! |---|---|---|
//! | in | `joinDelivery` | delivery ID (`"delivery_3"`, `"3"` or `3`) |
//! | in | `leaveDelivery` | delivery ID |
//! | in | `locationUpdate` | `{deliveryId, lat, lng, status?, timestamp?}` |
//! | in | `sendMessage` | any JSON |
//! | out | `locationUpdate` | `{deliveryId, lat, lng, status, timestamp}` |
//! | out | `receiveMessage` | the chat payload, verbatim |
//! | out | `error` | `{error, message}` |
//!
//! A bad frame produces an `error` event; the session stays open.

use super::error::{ApiError, ErrorBody};
use super::AppState;
use crate::clients::RelayClient;
use crate::model::{DeliveryId, DeliveryLocationUpdate};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamMap;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    JoinDelivery(Value),
    LeaveDelivery(Value),
    LocationUpdate(DeliveryLocationUpdate),
    SendMessage(Value),
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    LocationUpdate(DeliveryLocationUpdate),
    ReceiveMessage(Value),
    Error(ErrorBody),
}

/// Rooms joined by one connection.
pub struct Session {
    relay: RelayClient,
    rooms: StreamMap<DeliveryId, BroadcastStream<DeliveryLocationUpdate>>,
}

impl Session {
    pub fn new(relay: RelayClient) -> Self {
        Self {
            relay,
            rooms: StreamMap::new(),
        }
    }

    pub fn joined(&self) -> impl Iterator<Item = &DeliveryId> {
        self.rooms.keys()
    }

    /// Applies one inbound text frame.
    pub async fn handle_text(&mut self, text: &str) -> Result<(), ApiError> {
        let event: ClientEvent = serde_json::from_str(text)
            .map_err(|e| ApiError::BadRequest(format!("Unrecognized event: {e}")))?;

        match event {
            ClientEvent::JoinDelivery(room) => {
                let delivery_id = room_id(&room)?;
                if !self.rooms.contains_key(&delivery_id) {
                    let receiver = self.relay.join(delivery_id).await?;
                    self.rooms.insert(delivery_id, BroadcastStream::new(receiver));
                }
                debug!(%delivery_id, "Joined delivery");
            }
            ClientEvent::LeaveDelivery(room) => {
                let delivery_id = room_id(&room)?;
                self.rooms.remove(&delivery_id);
                debug!(%delivery_id, "Left delivery");
            }
            ClientEvent::LocationUpdate(update) => {
                update.position().validate()?;
                self.relay.publish(update).await?;
            }
            ClientEvent::SendMessage(message) => {
                self.relay.send_chat(message).await?;
            }
        }
        Ok(())
    }
}

/// Socket.IO clients send room names as strings; numbers are accepted too.
fn room_id(value: &Value) -> Result<DeliveryId, ApiError> {
    match value {
        Value::String(text) => Ok(text.parse()?),
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(DeliveryId)
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid delivery id: {number}"))),
        other => Err(ApiError::BadRequest(format!(
            "Delivery id must be a string, got {other}"
        ))),
    }
}

pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, state.relay))
}

async fn run_session(socket: WebSocket, relay: RelayClient) {
    let mut chat = match relay.subscribe_chat().await {
        Ok(receiver) => BroadcastStream::new(receiver),
        Err(e) => {
            warn!(error = %e, "Relay unavailable, closing socket");
            return;
        }
    };
    let mut session = Session::new(relay);
    let (mut sink, mut stream) = socket.split();
    info!("Socket connected");

    loop {
        let outgoing = tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => session
                    .handle_text(text.as_str())
                    .await
                    .err()
                    .map(|e| ServerEvent::Error(e.body())),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => None,
                Some(Err(e)) => {
                    debug!(error = %e, "Socket read failed");
                    break;
                }
            },
            message = chat.next() => match message {
                Some(Ok(message)) => Some(ServerEvent::ReceiveMessage(message)),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(skipped, "Chat subscriber lagging");
                    None
                }
                // Relay stopped.
                None => break,
            },
            Some((delivery_id, update)) = session.rooms.next(), if !session.rooms.is_empty() => {
                match update {
                    Ok(update) => Some(ServerEvent::LocationUpdate(update)),
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        warn!(%delivery_id, skipped, "Watcher lagging, skipped updates");
                        None
                    }
                }
            }
        };

        if let Some(event) = outgoing {
            if let Err(e) = send(&mut sink, &event).await {
                debug!(error = %e, "Socket write failed");
                break;
            }
        }
    }

    info!(rooms = session.rooms.len(), "Socket disconnected");
}

async fn send(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Dropping unserializable event");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeliveryStatus;
    use crate::relay;
    use std::time::Duration;
    use tokio::time::timeout;

    fn start_relay() -> RelayClient {
        let (actor, client) = relay::new(16, 8, 8);
        tokio::spawn(actor.run());
        client
    }

    #[test]
    fn events_use_socket_io_names() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"joinDelivery","data":"delivery_4"}"#).unwrap();
        assert!(matches!(event, ClientEvent::JoinDelivery(Value::String(_))));

        let out = ServerEvent::ReceiveMessage(serde_json::json!({"text": "hi"}));
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            serde_json::json!({"event": "receiveMessage", "data": {"text": "hi"}})
        );
    }

    #[test]
    fn room_ids_accept_strings_and_numbers() {
        assert_eq!(room_id(&Value::from("delivery_4")).unwrap(), DeliveryId(4));
        assert_eq!(room_id(&Value::from("4")).unwrap(), DeliveryId(4));
        assert_eq!(room_id(&Value::from(4)).unwrap(), DeliveryId(4));
        assert!(room_id(&Value::from(-4)).is_err());
        assert!(room_id(&Value::Null).is_err());
    }

    #[tokio::test]
    async fn joined_session_receives_its_room_only() {
        let relay = start_relay();
        let mut watching_one = Session::new(relay.clone());
        let mut watching_two = Session::new(relay.clone());
        watching_one
            .handle_text(r#"{"event":"joinDelivery","data":"delivery_1"}"#)
            .await
            .unwrap();
        watching_two
            .handle_text(r#"{"event":"joinDelivery","data":"delivery_2"}"#)
            .await
            .unwrap();

        let mut reporter = Session::new(relay.clone());
        reporter
            .handle_text(
                r#"{"event":"locationUpdate","data":{"deliveryId":"delivery_1","lat":22.72,"lng":75.86}}"#,
            )
            .await
            .unwrap();

        let (id, update) = timeout(Duration::from_secs(1), watching_one.rooms.next())
            .await
            .unwrap()
            .unwrap();
        let update = update.unwrap();
        assert_eq!(id, DeliveryId(1));
        assert_eq!(update.status, DeliveryStatus::InTransit);
        assert!(update.timestamp.is_some());

        assert!(
            timeout(Duration::from_millis(50), watching_two.rooms.next())
                .await
                .is_err(),
            "delivery_2 watcher must not see delivery_1 updates"
        );
    }

    #[tokio::test]
    async fn leaving_stops_updates() {
        let relay = start_relay();
        let mut session = Session::new(relay.clone());
        session
            .handle_text(r#"{"event":"joinDelivery","data":3}"#)
            .await
            .unwrap();
        assert_eq!(session.joined().collect::<Vec<_>>(), vec![&DeliveryId(3)]);

        session
            .handle_text(r#"{"event":"leaveDelivery","data":"delivery_3"}"#)
            .await
            .unwrap();
        assert_eq!(session.joined().count(), 0);
    }

    #[tokio::test]
    async fn bad_frames_are_reported() {
        let relay = start_relay();
        let mut session = Session::new(relay);

        let err = session.handle_text("not json").await.unwrap_err();
        assert_eq!(err.body().error, "Invalid request");

        let err = session
            .handle_text(
                r#"{"event":"locationUpdate","data":{"deliveryId":"delivery_1","lat":95.0,"lng":75.86}}"#,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Latitude"));
    }

    #[tokio::test]
    async fn chat_reaches_every_subscriber() {
        let relay = start_relay();
        let mut first = relay.subscribe_chat().await.unwrap();
        let mut second = relay.subscribe_chat().await.unwrap();

        let mut sender = Session::new(relay);
        sender
            .handle_text(r#"{"event":"sendMessage","data":{"from":"farmer","text":"Where is my order?"}}"#)
            .await
            .unwrap();

        let expected = serde_json::json!({"from": "farmer", "text": "Where is my order?"});
        assert_eq!(first.recv().await.unwrap(), expected);
        assert_eq!(second.recv().await.unwrap(), expected);
    }
}
