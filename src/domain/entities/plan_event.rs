use serde::Serialize;
use uuid::Uuid;

use super::{plan_status::PlanType, resolved_plan::ResolvedPlan};

/// Observability events emitted around plan resolution and plan changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlanEvent {
    PlanLoaded {
        plan_name: String,
        plan_type: PlanType,
        is_expired: bool,
        days_remaining: i64,
    },
    LegacyPlanLoaded {
        plan_name: String,
        plan_type: PlanType,
        is_expired: bool,
        days_remaining: i64,
    },
    PlanLoadFailed {
        user_id: Uuid,
        error: String,
    },
    PlanUpgraded {
        old_plan_name: String,
        new_plan_name: String,
        user_id: Uuid,
    },
    PlanCancelled {
        plan_name: String,
        user_id: Uuid,
    },
}

impl PlanEvent {
    pub fn plan_loaded(plan: &ResolvedPlan) -> Self {
        PlanEvent::PlanLoaded {
            plan_name: plan.plan_name.clone(),
            plan_type: plan.plan_type,
            is_expired: plan.is_expired,
            days_remaining: plan.days_remaining,
        }
    }

    pub fn legacy_plan_loaded(plan: &ResolvedPlan) -> Self {
        PlanEvent::LegacyPlanLoaded {
            plan_name: plan.plan_name.clone(),
            plan_type: plan.plan_type,
            is_expired: plan.is_expired,
            days_remaining: plan.days_remaining,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlanEvent::PlanLoaded { .. } => "plan_loaded",
            PlanEvent::LegacyPlanLoaded { .. } => "legacy_plan_loaded",
            PlanEvent::PlanLoadFailed { .. } => "plan_load_failed",
            PlanEvent::PlanUpgraded { .. } => "plan_upgraded",
            PlanEvent::PlanCancelled { .. } => "plan_cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_tag_matches_name() {
        let event = PlanEvent::PlanCancelled {
            plan_name: "Pro".to_string(),
            user_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], event.name());
        assert_eq!(json["plan_name"], "Pro");
    }

    #[test]
    fn test_load_failed_payload() {
        let user_id = Uuid::new_v4();
        let event = PlanEvent::PlanLoadFailed {
            user_id,
            error: "connection reset".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "plan_load_failed");
        assert_eq!(json["user_id"], user_id.to_string());
        assert_eq!(json["error"], "connection reset");
    }
}
