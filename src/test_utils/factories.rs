//! Test data factories for creating valid plan records.
//!
//! Each factory returns a complete record with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::plan_record::{
    BillingMetadata, PlanCatalogEntry, RawCurrentPlanRecord, RawLegacyPlanRecord,
};

/// A naive UTC timestamp `days` from now. Negative values lie in the past.
pub fn days_from_now(days: i64) -> NaiveDateTime {
    (Utc::now() + Duration::days(days)).naive_utc()
}

/// Create a paid "Pro" catalog entry.
pub fn create_test_catalog_entry(overrides: impl FnOnce(&mut PlanCatalogEntry)) -> PlanCatalogEntry {
    let mut entry = PlanCatalogEntry {
        id: Uuid::new_v4(),
        name: "Pro".to_string(),
        description: Some("Full access to every workspace feature".to_string()),
        price_cents: 4_900,
        currency: "usd".to_string(),
        duration_days: 30,
        features: vec!["research".to_string(), "emails".to_string()],
        is_free: None,
    };
    overrides(&mut entry);
    entry
}

/// Create an active current-schema row ending in 30 days, joined to a "Pro" entry.
pub fn create_test_current_plan(
    user_id: Uuid,
    overrides: impl FnOnce(&mut RawCurrentPlanRecord),
) -> RawCurrentPlanRecord {
    let plan = create_test_catalog_entry(|_| {});
    let mut record = RawCurrentPlanRecord {
        id: Uuid::new_v4(),
        user_id,
        plan_id: plan.id,
        start_date: Some(days_from_now(0)),
        end_date: Some(days_from_now(30)),
        is_active: true,
        status: "active".to_string(),
        billing: BillingMetadata {
            subscription_id: Some("sub_test_123".to_string()),
            amount_cents: Some(4_900),
            currency: Some("usd".to_string()),
            ..Default::default()
        },
        plan: Some(plan),
        created_at: Some(days_from_now(0)),
    };
    overrides(&mut record);
    record
}

/// Create a legacy row for a "Pro" plan ending in 30 days.
pub fn create_test_legacy_plan(
    user_id: Uuid,
    overrides: impl FnOnce(&mut RawLegacyPlanRecord),
) -> RawLegacyPlanRecord {
    let mut record = RawLegacyPlanRecord {
        id: Uuid::new_v4(),
        user_id,
        plan_name: "Pro".to_string(),
        start_date: Some(days_from_now(0)),
        end_date: Some(days_from_now(30)),
        duration_days: Some(30),
        created_at: Some(days_from_now(0)),
    };
    overrides(&mut record);
    record
}
