use crate::domain::entities::plan_event::PlanEvent;

/// Destination for plan observability events. Emission never fails.
pub trait PlanEventSink: Send + Sync {
    fn emit(&self, event: PlanEvent);
}
