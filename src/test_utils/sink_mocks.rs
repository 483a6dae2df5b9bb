//! Recording implementation of the plan event port.

use std::sync::Mutex;

use crate::{
    application::ports::plan_events::PlanEventSink, domain::entities::plan_event::PlanEvent,
};

/// Keeps every emitted event in order (for test assertions).
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<PlanEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PlanEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(PlanEvent::name).collect()
    }
}

impl PlanEventSink for RecordingEventSink {
    fn emit(&self, event: PlanEvent) {
        self.events.lock().unwrap().push(event);
    }
}
