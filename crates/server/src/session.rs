use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use facewatch_core::broadcast::domain::server_event::ServerEvent;
use facewatch_core::broadcast::domain::subscriber_handle::{
    DeliveryError, SubscriberHandle, SubscriberId,
};
use facewatch_core::broadcast::group_registry::GroupRegistry;
use facewatch_core::shared::constants::FACES_TOPIC;

/// Events buffered per subscriber before it counts as lagging.
pub const EVENT_QUEUE_CAPACITY: usize = 100;

/// Longest a single outbound frame may take before the session gives up.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// What the peer sent, reduced to what a subscriber session cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundFrame {
    /// Text or binary payload. Ignored.
    Data,
    /// Ping/pong, answered by the transport itself.
    Control,
    Close,
}

/// Bidirectional message channel to one real-time client.
#[async_trait]
pub trait SessionTransport: Send {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Next inbound frame, or `None` once the peer is gone.
    async fn recv(&mut self) -> Option<Result<InboundFrame, TransportError>>;
}

#[async_trait]
impl SessionTransport for WebSocket {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        WebSocket::send(self, Message::Text(text.into()))
            .await
            .map_err(|e| TransportError(e.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<InboundFrame, TransportError>> {
        let Some(message) = WebSocket::recv(self).await else {
            return None;
        };
        Some(match message {
            Ok(Message::Text(_)) | Ok(Message::Binary(_)) => Ok(InboundFrame::Data),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => Ok(InboundFrame::Control),
            Ok(Message::Close(_)) => Ok(InboundFrame::Close),
            Err(e) => Err(TransportError(e.to_string())),
        })
    }
}

/// Registry-facing handle that forwards events into a session's queue.
///
/// Never blocks: a full queue is reported as [`DeliveryError::Lagged`] and
/// the registry drops the subscriber.
pub struct ChannelSubscriber {
    id: SubscriberId,
    sender: mpsc::Sender<ServerEvent>,
}

impl ChannelSubscriber {
    pub fn new(id: SubscriberId, sender: mpsc::Sender<ServerEvent>) -> Self {
        Self { id, sender }
    }
}

impl fmt::Debug for ChannelSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSubscriber")
            .field("id", &self.id)
            .field("channel_closed", &self.sender.is_closed())
            .finish()
    }
}

impl SubscriberHandle for ChannelSubscriber {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn deliver(&self, event: &ServerEvent) -> Result<(), DeliveryError> {
        self.sender.try_send(event.clone()).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Lagged(self.id),
            TrySendError::Closed(_) => DeliveryError::Disconnected(self.id),
        })
    }
}

/// Topic membership that ends when the guard is dropped, including when the
/// owning task is cancelled or panics.
pub struct MembershipGuard {
    registry: Arc<GroupRegistry>,
    topic: String,
    id: SubscriberId,
}

impl MembershipGuard {
    pub fn join(
        registry: Arc<GroupRegistry>,
        topic: impl Into<String>,
        handle: Arc<dyn SubscriberHandle>,
    ) -> Self {
        let topic = topic.into();
        let id = handle.id();
        registry.join(&topic, handle);
        Self {
            registry,
            topic,
            id,
        }
    }
}

impl Drop for MembershipGuard {
    fn drop(&mut self) {
        self.registry.leave(&self.topic, self.id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

/// One real-time client subscribed to face detection results.
pub struct SubscriberSession {
    id: SubscriberId,
    registry: Arc<GroupRegistry>,
    state: SessionState,
    send_timeout: Duration,
}

impl SubscriberSession {
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            registry,
            state: SessionState::Connecting,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Serves the client until it disconnects, a send fails or times out, or
    /// the registry drops this subscriber.
    pub async fn run<T: SessionTransport>(&mut self, transport: &mut T) {
        let (sender, mut events) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let handle = Arc::new(ChannelSubscriber::new(self.id, sender));
        let _membership = MembershipGuard::join(self.registry.clone(), FACES_TOPIC, handle);
        self.state = SessionState::Open;
        log::info!("Subscriber {} connected", self.id);

        if let Err(e) = send_event(transport, &ServerEvent::connection_established(), self.send_timeout).await {
            log::warn!("Subscriber {}: greeting failed: {e}", self.id);
            self.state = SessionState::Closed;
            return;
        }

        loop {
            tokio::select! {
                inbound = transport.recv() => match inbound {
                    Some(Ok(InboundFrame::Data | InboundFrame::Control)) => {}
                    Some(Ok(InboundFrame::Close)) | None => break,
                    Some(Err(e)) => {
                        log::debug!("Subscriber {}: {e}", self.id);
                        break;
                    }
                },
                event = events.recv() => match event {
                    Some(event) => {
                        if let Err(e) = send_event(transport, &event, self.send_timeout).await {
                            log::debug!("Subscriber {}: {e}", self.id);
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        self.state = SessionState::Closed;
        log::info!("Subscriber {} disconnected", self.id);
    }
}

async fn send_event<T: SessionTransport>(
    transport: &mut T,
    event: &ServerEvent,
    send_timeout: Duration,
) -> Result<(), TransportError> {
    let text = event
        .to_json()
        .map_err(|e| TransportError(format!("failed to encode event: {e}")))?;
    tokio::time::timeout(send_timeout, transport.send_text(text))
        .await
        .map_err(|_| TransportError(format!("send timed out after {send_timeout:?}")))?
}
