//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::game_event::GameEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Run lifecycle and battle exchanges
    Dungeon,
    /// Quota grants and rejections
    Quota,
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::QuotaConsumed { .. } | GameEvent::QuotaRejected { .. } => Topic::Quota,
            _ => Topic::Dungeon,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is best-effort: an event with no
/// subscriber is dropped.
#[derive(Clone)]
pub struct EventBus {
    dungeon: broadcast::Sender<GameEvent>,
    quota: broadcast::Sender<GameEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dungeon: broadcast::channel(capacity).0,
            quota: broadcast::channel(capacity).0,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: GameEvent) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<GameEvent> {
        self.sender(topic).subscribe()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<GameEvent> {
        match topic {
            Topic::Dungeon => &self.dungeon,
            Topic::Quota => &self.quota,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use game_core::{CharacterId, NodeId};

    use super::*;
    use crate::quota::QuotaKind;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut quota = bus.subscribe(Topic::Quota);

        bus.publish(GameEvent::NodeEntered {
            character: CharacterId(1),
            node: NodeId::new("gate"),
        });
        bus.publish(GameEvent::QuotaRejected {
            character: CharacterId(1),
            kind: QuotaKind::Lifespan,
            remaining: 0,
        });

        let event = quota.recv().await.unwrap();
        assert_eq!(event.topic(), Topic::Quota);
        assert!(quota.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        EventBus::new().publish(GameEvent::DungeonStarted {
            character: CharacterId(2),
            node: NodeId::new("gate"),
        });
    }
}
