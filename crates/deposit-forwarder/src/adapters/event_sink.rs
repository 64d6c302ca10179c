//! # Event Sinks
//!
//! Destinations for `ForwarderEvent`s.

use crate::events::ForwarderEvent;
use crate::ports::outbound::EventSink;
use tracing::info;

/// Keeps every emitted event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Vec<ForwarderEvent>,
}

impl RecordingEventSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in emission order.
    #[must_use]
    pub fn events(&self) -> &[ForwarderEvent] {
        &self.events
    }

    /// Drains the recorded events.
    pub fn take(&mut self) -> Vec<ForwarderEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&mut self, event: ForwarderEvent) {
        self.events.push(event);
    }
}

/// Writes each event to the log as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&mut self, event: ForwarderEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(topic = event.topic(), %payload, "Event emitted"),
            Err(e) => info!(topic = event.topic(), error = %e, ?event, "Event emitted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Address, U256};
    use crate::events::BatchProcessedPayload;
    use uuid::Uuid;

    fn event(records: usize) -> ForwarderEvent {
        ForwarderEvent::BatchProcessed(BatchProcessedPayload {
            batch_id: Uuid::new_v4(),
            submitter: Address::new([1u8; 20]),
            records_processed: records,
            total_forwarded_value: U256::from(records),
        })
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingEventSink::new();
        sink.emit(event(1));
        sink.emit(event(2));

        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[1],
            ForwarderEvent::BatchProcessed(p) if p.records_processed == 2
        ));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_tracing_sink_accepts_events() {
        let mut sink = TracingEventSink;
        sink.emit(event(3));
    }
}
