//! Topic-routed publish/subscribe hub backed by `tokio::sync::broadcast`.
//!
//! Stands in for the external live transport at its interface: topic
//! strings with `/` separators and MQTT-style `+`/`#` subscription
//! wildcards. Delivery is best-effort, at-most-once: when the buffer
//! fills, the oldest unconsumed messages are dropped and slow receivers
//! observe `RecvError::Lagged`. Durable state always lives in the stores,
//! never on the bus.

use serde_json::Value;
use tokio::sync::broadcast;

// ---

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// One published message: a topic and a JSON payload.
#[derive(Debug, Clone)]
pub struct Message {
    // ---
    pub topic: String,
    pub payload: Value,
}

/// In-process fan-out bus shared via `Arc<Bus>`.
pub struct Bus {
    sender: broadcast::Sender<Message>,
}

impl Bus {
    // ---
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a payload to a topic.
    ///
    /// With zero subscribers the message is silently dropped; that is the
    /// fire-and-forget contract of the live announcement path.
    pub fn publish(&self, topic: impl Into<String>, payload: Value) {
        // A SendError only means there are no receivers right now.
        let _ = self.sender.send(Message {
            topic: topic.into(),
            payload,
        });
    }

    /// Subscribe to every message on the bus; callers filter by topic.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.sender.subscribe()
    }

    /// Number of live subscriptions, for startup sequencing and tests.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---

/// Match a topic against a subscription filter.
///
/// `+` matches exactly one level, `#` matches the remainder of the topic.
/// `coldstorage/+/readings` matches `coldstorage/3/readings` but not
/// `coldstorage/3/alerts` or `coldstorage/3/readings/extra`.
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    // ---
    let mut filter_levels = filter.split('/');
    let mut topic_levels = topic.split('/');

    loop {
        match (filter_levels.next(), topic_levels.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(want), Some(got)) if want == got => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
