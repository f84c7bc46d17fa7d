use std::sync::Arc;

use accel_core::Topic;
use accel_logging::{accel_debug, accel_info, accel_warn};
use futures_util::{SinkExt, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::{AccelerationUpdate, LiveBook, PushTransport, TransportError};

#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(default)]
    accelerations: Option<AccelerationUpdate>,
}

/// Builds the wire message that turns `topic` on or off.
pub fn topic_message(topic: Topic, enabled: bool) -> Value {
    match topic {
        Topic::Accelerations => json!({ "track-accelerations": enabled }),
        Topic::Blocks => {
            let wanted: &[&str] = if enabled { &["blocks"] } else { &[] };
            json!({ "action": "want", "data": wanted })
        }
    }
}

/// Extracts the acceleration part of a push frame, if any.
pub fn parse_frame(text: &str) -> Result<Option<AccelerationUpdate>, TransportError> {
    let frame: Frame = serde_json::from_str(text)?;
    Ok(frame.accelerations)
}

/// Feeds incoming frames into `book` until the socket closes or errors, then
/// closes the book.
pub async fn pump_frames<S>(mut frames: S, book: &LiveBook)
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(frame) = frames.next().await {
        match frame {
            Ok(Message::Text(text)) => match parse_frame(text.as_str()) {
                Ok(Some(update)) => book.apply(update),
                Ok(None) => {}
                Err(err) => accel_warn!("ignoring push frame: {}", err),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                accel_warn!("push channel failed: {}", err);
                break;
            }
        }
    }
    accel_info!("push channel closed");
    book.close();
}

/// Websocket push channel. Topic changes are queued to a writer task; a reader
/// task folds incoming frames into the shared [`LiveBook`].
pub struct WsPushTransport {
    outgoing: mpsc::UnboundedSender<Message>,
}

impl WsPushTransport {
    pub async fn connect(
        url: &str,
        book: Arc<LiveBook>,
    ) -> Result<(Self, JoinHandle<()>), TransportError> {
        let (socket, _) = connect_async(url)
            .await
            .map_err(|err| TransportError::WebSocket(err.to_string()))?;
        accel_info!("connected push channel to {}", url);
        let (mut write, read) = socket.split();
        let (outgoing, mut queued) = mpsc::unbounded_channel::<Message>();

        let writer = tokio::spawn(async move {
            while let Some(message) = queued.recv().await {
                if let Err(err) = write.send(message).await {
                    accel_warn!("push channel write failed: {}", err);
                    break;
                }
            }
        });
        let reader = tokio::spawn(async move {
            pump_frames(read, &book).await;
            writer.abort();
        });

        Ok((Self { outgoing }, reader))
    }

    fn send(&self, value: Value) -> Result<(), TransportError> {
        accel_debug!("push -> {}", value);
        self.outgoing
            .send(Message::Text(value.to_string().into()))
            .map_err(|_| TransportError::Closed)
    }
}

impl PushTransport for WsPushTransport {
    fn subscribe(&self, topic: Topic) -> Result<(), TransportError> {
        self.send(topic_message(topic, true))
    }

    fn unsubscribe(&self, topic: Topic) -> Result<(), TransportError> {
        self.send(topic_message(topic, false))
    }
}
