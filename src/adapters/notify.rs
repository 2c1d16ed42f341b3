//! Remote notification adapter.
//!
//! Serialises every [`StationEvent`] to JSON and hands it to a publish
//! callback (an MQTT client, a message-queue producer, a test buffer).
//! Delivery is fire-and-forget: a failed publish is logged and dropped,
//! it never feeds back into the controller.
//!
//! ```json
//! {"event":"valve_changed","from":"Opened","to":"Closing","reason":"leak"}
//! ```

use log::warn;

use crate::app::events::{StationEvent, StationStatus};
use crate::app::ports::EventSink;

/// Event sink that publishes JSON payloads on a fixed topic.
pub struct PublishSink<F> {
    topic: &'static str,
    publish: F,
    failures: u32,
}

impl<F> PublishSink<F>
where
    F: FnMut(&str, &[u8]) -> anyhow::Result<()>,
{
    pub fn new(topic: &'static str, publish: F) -> Self {
        Self {
            topic,
            publish,
            failures: 0,
        }
    }

    /// Publish a status snapshot on `<topic>/status`.
    pub fn publish_status(&mut self, status: &StationStatus) {
        let mut topic = heapless::String::<64>::new();
        if topic.push_str(self.topic).is_err() || topic.push_str("/status").is_err() {
            warn!("notify: topic too long, status dropped");
            return;
        }
        match serde_json::to_vec(status) {
            Ok(payload) => self.send(&topic, &payload),
            Err(e) => warn!("notify: status encode failed: {e}"),
        }
    }

    /// Publishes that failed since construction.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn send(&mut self, topic: &str, payload: &[u8]) {
        if let Err(e) = (self.publish)(topic, payload) {
            self.failures = self.failures.saturating_add(1);
            warn!("notify: publish to {topic} failed: {e:#}");
        }
    }
}

impl<F> EventSink for PublishSink<F>
where
    F: FnMut(&str, &[u8]) -> anyhow::Result<()>,
{
    fn emit(&mut self, event: &StationEvent) {
        match serde_json::to_vec(event) {
            Ok(payload) => self.send(self.topic, &payload),
            Err(e) => warn!("notify: event encode failed: {e}"),
        }
    }
}
