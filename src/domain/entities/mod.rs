pub mod denial_notice;
pub mod feature;
pub mod plan_event;
pub mod plan_record;
pub mod plan_status;
pub mod resolved_plan;
