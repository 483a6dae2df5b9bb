pub mod entitlement;
pub mod feature_gate;
pub mod plan_loader;
pub mod plan_status;
