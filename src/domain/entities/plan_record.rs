use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tier definition from the plan catalog, joined onto current-schema rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub currency: String,
    pub duration_days: i32,
    pub features: Vec<String>,
    /// Explicit free/paid classification. `None` for catalog rows created
    /// before the column existed.
    pub is_free: Option<bool>,
}

/// Payment-provider linkage stored alongside a current-schema plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingMetadata {
    pub subscription_id: Option<String>,
    pub invoice_id: Option<String>,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    pub receipt_url: Option<String>,
    pub invoice_url: Option<String>,
}

/// Row of the current billing schema (`user_plans` joined to `plans`).
#[derive(Debug, Clone, PartialEq)]
pub struct RawCurrentPlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub is_active: bool,
    /// Free text, usually "active" or "cancelled".
    pub status: String,
    pub billing: BillingMetadata,
    /// `None` when the catalog join found nothing.
    pub plan: Option<PlanCatalogEntry>,
    pub created_at: Option<NaiveDateTime>,
}

/// Row of the legacy billing schema. No status, no price, no catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLegacyPlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_name: String,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub duration_days: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
}
