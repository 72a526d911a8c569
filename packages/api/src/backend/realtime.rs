//! Row-change subscriptions over the backend's realtime socket.
//!
//! The socket speaks the Phoenix channel protocol: JSON frames of
//! `{ topic, event, payload, ref }`. A channel is joined with a `phx_join` whose
//! payload lists the `postgres_changes` to stream, kept alive with a `heartbeat` on
//! the `phoenix` topic every 30 seconds, and left with `phx_leave`. Row changes
//! arrive as `postgres_changes` events.
//!
//! Only browser builds have a transport (`gloo-net`); elsewhere
//! [`Backend::subscribe`] fails with [`BackendError::Unsupported`].

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::Backend;
use crate::error::{BackendError, Result};

pub const HEARTBEAT_INTERVAL_MS: u32 = 30_000;
const PROTOCOL_VERSION: &str = "1.0.0";

/// One Phoenix channel frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

impl ChannelMessage {
    /// Join `topic`, streaming the given row changes.
    pub fn join(
        topic: &str,
        changes: &[PostgresChanges],
        access_token: Option<&str>,
        reference: u64,
    ) -> Self {
        let mut payload = json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": changes,
            }
        });
        if let Some(token) = access_token {
            payload["access_token"] = json!(token);
        }
        Self {
            topic: topic.to_string(),
            event: "phx_join".to_string(),
            payload,
            reference: Some(reference.to_string()),
        }
    }

    pub fn heartbeat(reference: u64) -> Self {
        Self {
            topic: "phoenix".to_string(),
            event: "heartbeat".to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }

    pub fn leave(topic: &str, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: "phx_leave".to_string(),
            payload: json!({}),
            reference: Some(reference.to_string()),
        }
    }
}

/// Which row events a channel listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "*")]
    All,
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
}

/// A `postgres_changes` listener definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostgresChanges {
    pub event: ChangeKind,
    pub schema: String,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl PostgresChanges {
    /// Every change on a `public` table.
    pub fn on(table: &str) -> Self {
        Self {
            event: ChangeKind::All,
            schema: "public".to_string(),
            table: table.to_string(),
            filter: None,
        }
    }

    /// Only rows whose `column` equals `value`.
    pub fn filter_eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filter = Some(format!("{column}=eq.{value}"));
        self
    }
}

/// A decoded row change.
#[derive(Debug, Clone, PartialEq)]
pub struct Change<T> {
    pub kind: ChangeKind,
    /// New row for inserts and updates.
    pub record: Option<T>,
    /// Previous row (at least its primary key) for updates and deletes.
    pub old_record: Option<Value>,
}

impl<T> Change<T> {
    /// `id` of the previous row, if it was sent.
    pub fn old_id(&self) -> Option<Uuid> {
        self.old_record
            .as_ref()?
            .get("id")?
            .as_str()?
            .parse()
            .ok()
    }
}

/// What a frame from the server means for a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming<T> {
    Change(Change<T>),
    /// Reply to one of our pushes.
    Reply {
        reference: Option<String>,
        ok: bool,
        response: Value,
    },
    Closed(String),
    /// Presence, heartbeat acks and other frames with nothing to apply.
    Ignored,
}

#[derive(Deserialize)]
struct ChangePayload {
    data: ChangeData,
}

#[derive(Deserialize)]
struct ChangeData {
    #[serde(rename = "type")]
    kind: ChangeKind,
    #[serde(default)]
    record: Option<Value>,
    #[serde(default)]
    old_record: Option<Value>,
}

/// Decode one text frame.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<Incoming<T>> {
    let message: ChannelMessage = serde_json::from_str(text)?;
    match message.event.as_str() {
        "postgres_changes" => {
            let payload: ChangePayload = serde_json::from_value(message.payload)?;
            let record = match payload.data.record {
                Some(value) if !is_empty_object(&value) => Some(serde_json::from_value(value)?),
                _ => None,
            };
            let old_record = payload
                .data
                .old_record
                .filter(|value| !is_empty_object(value));
            Ok(Incoming::Change(Change {
                kind: payload.data.kind,
                record,
                old_record,
            }))
        }
        "phx_reply" => {
            let ok = message.payload.get("status").and_then(Value::as_str) == Some("ok");
            let response = message
                .payload
                .get("response")
                .cloned()
                .unwrap_or(Value::Null);
            Ok(Incoming::Reply {
                reference: message.reference,
                ok,
                response,
            })
        }
        "phx_error" | "phx_close" => Ok(Incoming::Closed(format!(
            "{} on {}",
            message.event, message.topic
        ))),
        _ => Ok(Incoming::Ignored),
    }
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|o| o.is_empty())
}

/// Socket URL for the realtime service.
pub fn socket_url(base_url: &str, api_key: &str) -> String {
    let base = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base_url.to_string()
    };
    format!(
        "{base}/realtime/v1/websocket?apikey={}&vsn={PROTOCOL_VERSION}",
        urlencoding::encode(api_key)
    )
}

/// A joined channel streaming changes of `T` rows.
pub struct Channel<T> {
    topic: String,
    next_ref: u64,
    #[cfg(target_arch = "wasm32")]
    sink: futures::stream::SplitSink<
        gloo_net::websocket::futures::WebSocket,
        gloo_net::websocket::Message,
    >,
    #[cfg(target_arch = "wasm32")]
    stream: futures::stream::SplitStream<gloo_net::websocket::futures::WebSocket>,
    #[cfg(target_arch = "wasm32")]
    heartbeat: gloo_timers::future::IntervalStream,
    _rows: PhantomData<fn() -> T>,
}

impl<T> Channel<T> {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn take_ref(&mut self) -> u64 {
        self.next_ref += 1;
        self.next_ref
    }
}

impl Backend {
    /// Open the realtime socket and join `realtime:<name>` for `changes`.
    ///
    /// Resolves once the server acknowledged the join.
    #[cfg(target_arch = "wasm32")]
    pub async fn subscribe<T: DeserializeOwned>(
        &self,
        name: &str,
        changes: &[PostgresChanges],
    ) -> Result<Channel<T>> {
        use futures::{SinkExt, StreamExt};
        use gloo_net::websocket::futures::WebSocket;

        let url = socket_url(&self.inner.config.url, &self.inner.config.anon_key);
        let socket = WebSocket::open(&url).map_err(|e| BackendError::Realtime(e.to_string()))?;
        let (sink, stream) = socket.split();

        let mut channel = Channel {
            topic: format!("realtime:{name}"),
            next_ref: 0,
            sink,
            stream,
            heartbeat: gloo_timers::future::IntervalStream::new(HEARTBEAT_INTERVAL_MS),
            _rows: PhantomData,
        };

        let join_ref = channel.take_ref();
        let join_ref_str = join_ref.to_string();
        let join = ChannelMessage::join(
            &channel.topic,
            changes,
            self.access_token().as_deref(),
            join_ref,
        );
        channel.push(&join).await?;

        while let Some(frame) = channel.stream.next().await {
            let text = match frame {
                Ok(gloo_net::websocket::Message::Text(text)) => text,
                Ok(gloo_net::websocket::Message::Bytes(_)) => continue,
                Err(e) => return Err(BackendError::Realtime(e.to_string())),
            };
            match decode::<Value>(&text)? {
                Incoming::Reply {
                    reference,
                    ok,
                    response,
                } if reference.as_deref() == Some(join_ref_str.as_str()) => {
                    if ok {
                        tracing::info!(topic = %channel.topic, "joined realtime channel");
                        return Ok(channel);
                    }
                    let _ = channel.sink.close().await;
                    return Err(BackendError::Realtime(format!(
                        "join of {} rejected: {response}",
                        channel.topic
                    )));
                }
                Incoming::Closed(reason) => return Err(BackendError::Realtime(reason)),
                _ => {}
            }
        }
        Err(BackendError::Realtime("socket closed before join".to_string()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub async fn subscribe<T: DeserializeOwned>(
        &self,
        name: &str,
        changes: &[PostgresChanges],
    ) -> Result<Channel<T>> {
        let _ = (name, changes);
        Err(BackendError::Unsupported("realtime"))
    }
}

#[cfg(target_arch = "wasm32")]
impl<T: DeserializeOwned> Channel<T> {
    async fn push(&mut self, message: &ChannelMessage) -> Result<()> {
        use futures::SinkExt;

        let text = serde_json::to_string(message)?;
        self.sink
            .send(gloo_net::websocket::Message::Text(text))
            .await
            .map_err(|e| BackendError::Realtime(e.to_string()))
    }

    /// Wait for the next row change, sending heartbeats while idle.
    ///
    /// `None` means the socket closed; errors are per-frame and the channel stays usable.
    pub async fn next(&mut self) -> Option<Result<Change<T>>> {
        use futures::future::{select, Either};
        use futures::StreamExt;
        use gloo_net::websocket::{Message, WebSocketError};

        enum Wake {
            Frame(Option<std::result::Result<Message, WebSocketError>>),
            Heartbeat,
        }

        loop {
            let wake = {
                let read = self.stream.next();
                let tick = self.heartbeat.next();
                futures::pin_mut!(read, tick);
                match select(read, tick).await {
                    Either::Left((frame, _)) => Wake::Frame(frame),
                    Either::Right(_) => Wake::Heartbeat,
                }
            };

            match wake {
                Wake::Heartbeat => {
                    let reference = self.take_ref();
                    if let Err(e) = self.push(&ChannelMessage::heartbeat(reference)).await {
                        return Some(Err(e));
                    }
                }
                Wake::Frame(None) => return None,
                Wake::Frame(Some(Err(e))) => {
                    return Some(Err(BackendError::Realtime(e.to_string())))
                }
                Wake::Frame(Some(Ok(Message::Bytes(_)))) => {}
                Wake::Frame(Some(Ok(Message::Text(text)))) => match decode::<T>(&text) {
                    Ok(Incoming::Change(change)) => return Some(Ok(change)),
                    Ok(Incoming::Closed(reason)) => {
                        tracing::warn!(topic = %self.topic, "realtime channel closed: {reason}");
                        return None;
                    }
                    Ok(_) => {}
                    Err(e) => return Some(Err(e)),
                },
            }
        }
    }

    /// Leave the channel and close the socket.
    pub async fn unsubscribe(mut self) {
        use futures::SinkExt;

        let reference = self.take_ref();
        let leave = ChannelMessage::leave(&self.topic, reference);
        if let Err(e) = self.push(&leave).await {
            tracing::warn!(topic = %self.topic, "failed to leave channel: {e}");
        }
        let _ = self.sink.close().await;
        tracing::info!(topic = %self.topic, "left realtime channel");
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl<T: DeserializeOwned> Channel<T> {
    pub async fn next(&mut self) -> Option<Result<Change<T>>> {
        None
    }

    pub async fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Row {
        id: Uuid,
        message: String,
    }

    const ROW_ID: &str = "0b9c2d1e-7a4f-4e8b-9c3d-2e1f0a9b8c7d";

    #[test]
    fn test_join_message_shape() {
        let changes = [PostgresChanges::on("notifications").filter_eq("recipient_id", "u-1")];
        let join = ChannelMessage::join("realtime:notifications:u-1", &changes, Some("jwt"), 1);
        let value = serde_json::to_value(&join).unwrap();

        assert_eq!(value["event"], "phx_join");
        assert_eq!(value["ref"], "1");
        assert_eq!(value["payload"]["access_token"], "jwt");
        assert_eq!(
            value["payload"]["config"]["postgres_changes"],
            json!([{
                "event": "*",
                "schema": "public",
                "table": "notifications",
                "filter": "recipient_id=eq.u-1"
            }])
        );
    }

    #[test]
    fn test_heartbeat_and_leave() {
        let heartbeat = serde_json::to_value(ChannelMessage::heartbeat(7)).unwrap();
        assert_eq!(
            heartbeat,
            json!({ "topic": "phoenix", "event": "heartbeat", "payload": {}, "ref": "7" })
        );
        let leave = ChannelMessage::leave("realtime:x", 8);
        assert_eq!(leave.event, "phx_leave");
        assert_eq!(leave.topic, "realtime:x");
    }

    #[test]
    fn test_decode_insert() {
        let frame = json!({
            "topic": "realtime:notifications",
            "event": "postgres_changes",
            "ref": null,
            "payload": {
                "ids": [123],
                "data": {
                    "type": "INSERT",
                    "schema": "public",
                    "table": "notifications",
                    "commit_timestamp": "2024-05-01T12:00:00Z",
                    "record": { "id": ROW_ID, "message": "Ana começou a seguir você" },
                    "old_record": {}
                }
            }
        })
        .to_string();

        let Incoming::Change(change) = decode::<Row>(&frame).unwrap() else {
            panic!("expected a change");
        };
        assert_eq!(change.kind, ChangeKind::Insert);
        assert_eq!(change.record.unwrap().message, "Ana começou a seguir você");
        assert!(change.old_record.is_none());
    }

    #[test]
    fn test_decode_delete_exposes_old_id() {
        let frame = json!({
            "topic": "realtime:notifications",
            "event": "postgres_changes",
            "payload": {
                "data": {
                    "type": "DELETE",
                    "record": {},
                    "old_record": { "id": ROW_ID }
                }
            }
        })
        .to_string();

        let Incoming::Change(change) = decode::<Row>(&frame).unwrap() else {
            panic!("expected a change");
        };
        assert_eq!(change.kind, ChangeKind::Delete);
        assert!(change.record.is_none());
        assert_eq!(change.old_id(), Some(ROW_ID.parse().unwrap()));
    }

    #[test]
    fn test_decode_replies_and_other_frames() {
        let reply = json!({
            "topic": "realtime:x", "event": "phx_reply", "ref": "1",
            "payload": { "status": "ok", "response": { "postgres_changes": [] } }
        })
        .to_string();
        assert!(matches!(
            decode::<Row>(&reply).unwrap(),
            Incoming::Reply { ok: true, reference: Some(r), .. } if r == "1"
        ));

        let closed = json!({ "topic": "realtime:x", "event": "phx_close", "payload": {} }).to_string();
        assert!(matches!(decode::<Row>(&closed).unwrap(), Incoming::Closed(_)));

        let presence = json!({ "topic": "realtime:x", "event": "presence_state", "payload": {} }).to_string();
        assert_eq!(decode::<Row>(&presence).unwrap(), Incoming::Ignored);

        assert!(decode::<Row>("not json").is_err());
    }

    #[test]
    fn test_socket_url() {
        assert_eq!(
            socket_url("https://demo.supabase.co", "anon key"),
            "wss://demo.supabase.co/realtime/v1/websocket?apikey=anon%20key&vsn=1.0.0"
        );
        assert_eq!(
            socket_url("http://localhost:54321", "k"),
            "ws://localhost:54321/realtime/v1/websocket?apikey=k&vsn=1.0.0"
        );
    }

    #[tokio::test]
    async fn test_subscribe_is_unsupported_off_browser() {
        let backend = Backend::new(crate::config::BackendConfig::new("https://demo.supabase.co", "anon"));
        let result = backend
            .subscribe::<Row>("notifications", &[PostgresChanges::on("notifications")])
            .await;
        assert!(matches!(result, Err(BackendError::Unsupported("realtime"))));
    }
}
