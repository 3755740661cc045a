//! Event bus abstraction for decoupled presentation.
//!
//! The arbiter publishes through this trait so it can run under a terminal
//! driver, a UI shell, or a test harness without knowing which.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::BallEvent;

/// Trait for emitting events to subscribers.
pub trait EventBus: Send + Sync {
    /// Emit an event with a JSON payload.
    ///
    /// # Arguments
    /// * `topic` - Event name (e.g., "ball:answer_changed")
    /// * `payload` - JSON payload to emit
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

impl dyn EventBus {
    /// Emit a typed event under its own topic.
    pub fn publish<E: BallEvent + Serialize>(&self, event: &E) {
        match serde_json::to_value(event) {
            Ok(payload) => self.emit(E::TOPIC, payload),
            Err(e) => tracing::error!(topic = E::TOPIC, error = %e, "failed to serialize event"),
        }
    }
}

/// Type alias for shared event bus reference.
pub type EventBusRef = Arc<dyn EventBus>;

/// A captured event from [`InMemoryEventBus`].
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// In-memory event bus that records everything it is given.
#[derive(Default)]
pub struct InMemoryEventBus {
    events: Mutex<Vec<EmittedEvent>>,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EmittedEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All captured events, oldest first.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.lock().clone()
    }

    /// Captured events for one topic.
    pub fn events_for(&self, topic: &str) -> Vec<EmittedEvent> {
        self.lock()
            .iter()
            .filter(|e| e.topic == topic)
            .cloned()
            .collect()
    }

    /// Captured events of one type, decoded. Payloads that fail to decode
    /// are skipped.
    pub fn decoded<E: BallEvent + DeserializeOwned>(&self) -> Vec<E> {
        self.lock()
            .iter()
            .filter(|e| e.topic == E::TOPIC)
            .filter_map(|e| serde_json::from_value(e.payload.clone()).ok())
            .collect()
    }

    /// The most recent event of one type.
    pub fn last<E: BallEvent + DeserializeOwned>(&self) -> Option<E> {
        self.decoded::<E>().pop()
    }

    /// Forget everything captured so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of captured events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no events were captured.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.lock().push(EmittedEvent {
            topic: topic.to_string(),
            payload,
        });
    }
}

/// Event bus that discards everything.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}
