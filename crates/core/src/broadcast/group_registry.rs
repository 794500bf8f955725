use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::broadcast::domain::server_event::ServerEvent;
use crate::broadcast::domain::subscriber_handle::{SubscriberHandle, SubscriberId};

type Members = HashMap<SubscriberId, Arc<dyn SubscriberHandle>>;

/// Outcome of one publish, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub dropped: usize,
}

/// Process-wide topic → subscriber membership.
///
/// Publishing snapshots a topic's members and releases the shard lock before
/// any delivery, so slow or dead subscribers never block `join`/`leave`.
/// A member added after the snapshot misses that publish; a member whose
/// delivery fails is removed.
#[derive(Default)]
pub struct GroupRegistry {
    topics: DashMap<String, Members>,
}

impl fmt::Debug for GroupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupRegistry")
            .field("topic_count", &self.topics.len())
            .finish()
    }
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handle` to `topic`. Joining twice with the same id keeps a
    /// single membership.
    pub fn join(&self, topic: &str, handle: Arc<dyn SubscriberHandle>) {
        let id = handle.id();
        self.topics
            .entry(topic.to_string())
            .or_default()
            .insert(id, handle);
        log::debug!("Subscriber {id} joined topic '{topic}'");
    }

    /// Removes `id` from `topic`; a no-op for non-members.
    pub fn leave(&self, topic: &str, id: SubscriberId) {
        let removed = match self.topics.get_mut(topic) {
            Some(mut members) => members.remove(&id).is_some(),
            None => false,
        };
        self.topics.remove_if(topic, |_, members| members.is_empty());
        if removed {
            log::debug!("Subscriber {id} left topic '{topic}'");
        }
    }

    /// Delivers `event` to every member of `topic` at the time of the call.
    pub fn publish(&self, topic: &str, event: &ServerEvent) -> PublishReport {
        let snapshot: Vec<Arc<dyn SubscriberHandle>> = self
            .topics
            .get(topic)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default();

        let mut report = PublishReport::default();
        for handle in snapshot {
            match handle.deliver(event) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    log::warn!("Dropping subscriber {} from '{topic}': {e}", handle.id());
                    self.leave(topic, handle.id());
                    report.dropped += 1;
                }
            }
        }
        log::debug!(
            "Published to '{topic}': {} delivered, {} dropped",
            report.delivered,
            report.dropped
        );
        report
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |members| members.len())
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}
