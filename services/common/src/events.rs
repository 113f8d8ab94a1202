//! Custom observability events.
//!
//! Handlers report business-level failures (missing configuration, unreadable
//! objects, rejected payloads) as custom events in addition to their regular log
//! lines. The telemetry backend groups them under a single event type.

use serde::Serialize;
use tracing::warn;

/// A custom event with its attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomEvent {
    pub message: String,
}

impl CustomEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sink for custom events
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait EventRecorder: Send + Sync {
    fn record(&self, event: CustomEvent);
}

/// Records custom events as `tracing` events on the `custom_event` target.
///
/// With OTLP export enabled the event is attached to the current span, which is
/// how it reaches the telemetry backend.
pub struct TracingEventRecorder {
    event_type: String,
}

impl TracingEventRecorder {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

impl EventRecorder for TracingEventRecorder {
    fn record(&self, event: CustomEvent) {
        warn!(
            target: "custom_event",
            event_type = %self.event_type,
            message = %event.message,
            "Custom event recorded"
        );
    }
}
