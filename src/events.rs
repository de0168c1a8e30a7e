use tokio::sync::broadcast;

use crate::tags::{CreateTag, Node, Tag};

/// Domain events published after successful mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TagCreated(CreateTag),
    TagUpdated(Tag),
    TagDeleted(Tag),
    NodeUpdated(Node),
}

impl Event {
    /// Stable wire name, as consumed by UI listeners.
    pub fn name(&self) -> &'static str {
        match self {
            Event::TagCreated(_) => "tag:created",
            Event::TagUpdated(_) => "tag:updated",
            Event::TagDeleted(_) => "tag:deleted",
            Event::NodeUpdated(_) => "node:updated",
        }
    }
}

pub trait Notifier: Send + Sync {
    fn emit(&self, event: Event);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn emit(&self, _event: Event) {}
}

/// Fans events out to broadcast subscribers.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<Event>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn emit(&self, event: Event) {
        // send only fails when there are no subscribers
        let _ = self.sender.send(event);
    }
}
