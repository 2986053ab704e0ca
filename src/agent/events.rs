//! Agent event channel
//!
//! Every state change is published for observers. The channel is bounded;
//! when an observer falls behind, new events are dropped and counted
//! rather than stalling the agent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

/// Capacity of the per-agent event channel
pub const EVENT_CAPACITY: usize = 100;

/// An observable agent event
#[derive(Debug, Clone)]
pub struct AgentEvent {
    /// Event kind, e.g. "state_change"
    pub kind: String,
    /// Wall-clock time of emission
    pub timestamp: SystemTime,
    /// Structured event data
    pub payload: Value,
}

/// Sender half of an agent's event channel
pub struct EventBus {
    tx: mpsc::Sender<AgentEvent>,
    dropped: AtomicU64,
}

impl EventBus {
    /// Create a bus and its receiver
    pub fn new() -> (Self, mpsc::Receiver<AgentEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_CAPACITY);
        (
            Self {
                tx,
                dropped: AtomicU64::new(0),
            },
            rx,
        )
    }

    /// Publish an event; lossy when the channel is full
    pub fn emit(&self, kind: &str, payload: Value) {
        let event = AgentEvent {
            kind: kind.to_string(),
            timestamp: SystemTime::now(),
            payload,
        };

        if self.tx.try_send(event).is_err() {
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(kind, total, "event channel full, event dropped");
        }
    }

    /// Number of events dropped so far
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emit_and_receive() {
        let (bus, mut rx) = EventBus::new();
        bus.emit("state_change", json!({"from": "Idle", "to": "Initializing"}));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.kind, "state_change");
        assert_eq!(event.payload["to"], "Initializing");
        assert_eq!(bus.dropped(), 0);
    }

    #[test]
    fn test_overflow_drops_instead_of_blocking() {
        let (bus, mut rx) = EventBus::new();

        for i in 0..EVENT_CAPACITY + 5 {
            bus.emit("tick", json!(i));
        }

        assert_eq!(bus.dropped(), 5);

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, EVENT_CAPACITY);
    }
}
