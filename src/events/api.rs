use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::api::ObjectReference;
use crate::client::ApiResourceClient;
use crate::events::{EventRecorder, EventType, LogEventRecorder};

/// Source component reported on every event.
pub const EVENT_COMPONENT: &str = "instance-manager";

/// Publishes core `Event` objects through the orchestration API.
///
/// Each event is also logged, so nothing is lost when publishing fails.
#[derive(Clone)]
pub struct ApiEventRecorder {
    client: ApiResourceClient,
    host: String,
}

impl ApiEventRecorder {
    pub fn new(client: ApiResourceClient, host: impl Into<String>) -> Self {
        Self {
            client,
            host: host.into(),
        }
    }

    fn event_document(
        &self,
        object: &ObjectReference,
        event_type: EventType,
        reason: &str,
        message: &str,
    ) -> Value {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let name = format!("{}.{}", object.name, uuid::Uuid::new_v4().simple());
        json!({
            "apiVersion": "v1",
            "kind": "Event",
            "metadata": {
                "name": name,
                "namespace": object.namespace,
            },
            "involvedObject": object,
            "reason": reason,
            "message": message,
            "type": event_type.as_str(),
            "source": {
                "component": EVENT_COMPONENT,
                "host": self.host,
            },
            "firstTimestamp": now,
            "lastTimestamp": now,
            "count": 1,
        })
    }
}

impl EventRecorder for ApiEventRecorder {
    fn record(&self, object: &ObjectReference, event_type: EventType, reason: &str, message: &str) {
        LogEventRecorder.record(object, event_type, reason, message);

        let document = self.event_document(object, event_type, reason, message);
        let path = format!("/api/v1/namespaces/{}/events", object.namespace);
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(reason, "no async runtime, event not published");
            return;
        };
        let client = self.client.clone();
        runtime.spawn(async move {
            if let Err(e) = client.post_json(&path, &document).await {
                tracing::warn!(error = %e, "failed to publish event");
            }
        });
    }
}
