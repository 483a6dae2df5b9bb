use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    plan_record::BillingMetadata,
    plan_status::{PlanSource, PlanStatus, PlanType, RecordStatus},
};

pub const NO_PLAN_NAME: &str = "No Plan";

/// Canonical plan state for one user, produced by a single resolution.
///
/// Never mutated after construction; a new resolution replaces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPlan {
    pub plan_name: String,
    pub price_cents: i64,
    pub currency: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: RecordStatus,
    pub plan_type: PlanType,
    pub plan_status: PlanStatus,
    pub is_expired: bool,
    pub days_remaining: i64,
    pub renewal_date: String,
    pub is_expiring_soon: bool,
    pub source: PlanSource,
    pub features: Vec<String>,
    pub billing: Option<BillingMetadata>,
}

impl ResolvedPlan {
    /// Fail-closed state used when no usable record exists.
    pub fn no_plan(now: DateTime<Utc>) -> Self {
        Self {
            plan_name: NO_PLAN_NAME.to_string(),
            price_cents: 0,
            currency: "usd".to_string(),
            start_date: now,
            end_date: now,
            status: RecordStatus::None,
            plan_type: PlanType::Free,
            plan_status: PlanStatus::NoPlan,
            is_expired: true,
            days_remaining: 0,
            renewal_date: String::new(),
            is_expiring_soon: false,
            source: PlanSource::None,
            features: Vec::new(),
            billing: None,
        }
    }

    pub fn is_no_plan(&self) -> bool {
        self.plan_status == PlanStatus::NoPlan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_plan_sentinel() {
        let plan = ResolvedPlan::no_plan(Utc::now());

        assert_eq!(plan.plan_name, "No Plan");
        assert!(plan.is_expired);
        assert_eq!(plan.days_remaining, 0);
        assert_eq!(plan.plan_type, PlanType::Free);
        assert_eq!(plan.source, PlanSource::None);
        assert!(plan.is_no_plan());
    }
}
