pub mod notice_sink;
pub mod plan_events;
