use tracing::info;

use crate::{
    application::ports::plan_events::PlanEventSink, domain::entities::plan_event::PlanEvent,
};

/// Writes plan events as structured log records under the `plan_events`
/// target, so they can be routed separately by the subscriber.
#[derive(Debug, Default, Clone)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl PlanEventSink for TracingEventSink {
    fn emit(&self, event: PlanEvent) {
        let payload = serde_json::to_string(&event).unwrap_or_else(|_| event.name().to_string());
        info!(target: "plan_events", plan_event = event.name(), payload = %payload, "Plan event");
    }
}
