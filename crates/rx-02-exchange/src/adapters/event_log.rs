//! Event sinks

use crate::events::ExchangeEvent;
use crate::ports::outbound::EventPublisher;
use parking_lot::RwLock;
use tracing::{info, warn};

/// Keeps every published event in order.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<ExchangeEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExchangeEvent> {
        self.events.read().clone()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events.read().iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventPublisher for InMemoryEventLog {
    fn publish(&self, event: ExchangeEvent) {
        self.events.write().push(event);
    }
}

/// Writes events to the tracing subscriber as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

impl EventPublisher for TracingEventPublisher {
    fn publish(&self, event: ExchangeEvent) {
        if let Some(payload) = event_payload(&event) {
            info!(kind = event.kind(), %payload, "[rx-02] event");
        }
    }
}

/// JSON body of `event`, or `None` (with a warning) if it cannot be encoded.
fn event_payload(event: &ExchangeEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!(kind = event.kind(), "[rx-02] event not serializable: {}", e);
            None
        }
    }
}
