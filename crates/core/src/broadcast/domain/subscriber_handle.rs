use thiserror::Error;
use uuid::Uuid;

use crate::broadcast::domain::server_event::ServerEvent;

pub type SubscriberId = Uuid;

/// Per-subscriber send failure. Never surfaced to publishers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("subscriber {0} is disconnected")]
    Disconnected(SubscriberId),
    #[error("subscriber {0} is not keeping up")]
    Lagged(SubscriberId),
}

/// Send capability of one live connection, as seen by the registry.
///
/// `deliver` must not block on the connection itself; implementations hand
/// the event to the owning session, which performs the actual write.
pub trait SubscriberHandle: Send + Sync {
    fn id(&self) -> SubscriberId;

    fn deliver(&self, event: &ServerEvent) -> Result<(), DeliveryError>;
}
