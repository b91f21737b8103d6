//! Event recording for resources touched by the instance manager.
//!
//! Recording is fire-and-forget: callers never wait on delivery and never
//! see delivery failures.

mod api;

pub use api::ApiEventRecorder;

use std::fmt;

use crate::api::ObjectReference;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Normal,
    Warning,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Normal => "Normal",
            EventType::Warning => "Warning",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait EventRecorder: Send + Sync {
    fn record(&self, object: &ObjectReference, event_type: EventType, reason: &str, message: &str);
}

/// Emits events as log records only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventRecorder;

impl EventRecorder for LogEventRecorder {
    fn record(&self, object: &ObjectReference, event_type: EventType, reason: &str, message: &str) {
        match event_type {
            EventType::Normal => tracing::info!(
                kind = %object.kind,
                namespace = %object.namespace,
                name = %object.name,
                reason,
                "{}",
                message
            ),
            EventType::Warning => tracing::warn!(
                kind = %object.kind,
                namespace = %object.namespace,
                name = %object.name,
                reason,
                "{}",
                message
            ),
        }
    }
}
