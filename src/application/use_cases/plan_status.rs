use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::plan_status::{PlanStatus, PlanType, RecordStatus};

const MS_PER_DAY: i64 = 86_400_000;

/// Name fragments that mark a plan as free when the catalog gives no
/// explicit classification (legacy rows, old catalog entries).
const FREE_PLAN_MARKERS: [&str; 3] = ["trial", "beta", "free"];

/// Inputs to a status computation, taken from a normalized plan record.
#[derive(Debug, Clone, Copy)]
pub struct StatusInput<'a> {
    pub plan_name: &'a str,
    pub price_cents: i64,
    pub catalog_is_free: Option<bool>,
    pub end_date: DateTime<Utc>,
    pub status: RecordStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStatusSnapshot {
    pub plan_status: PlanStatus,
    pub is_expired: bool,
    pub days_remaining: i64,
    pub plan_type: PlanType,
    pub renewal_date: String,
}

impl PlanStatusSnapshot {
    pub fn is_expiring_soon(&self, threshold_days: i64) -> bool {
        !self.is_expired && self.days_remaining <= threshold_days
    }
}

pub fn compute_status(input: &StatusInput<'_>, now: DateTime<Utc>) -> PlanStatusSnapshot {
    let plan_status = canonical_status(input.end_date, input.status, now);
    PlanStatusSnapshot {
        plan_status,
        is_expired: plan_status.is_expired(),
        days_remaining: days_remaining(input.end_date, now),
        plan_type: classify_plan_type(input.plan_name, input.price_cents, input.catalog_is_free),
        renewal_date: format_renewal_date(input.end_date),
    }
}

/// Whole days left until `end_date`, rounded up. Never negative.
pub fn days_remaining(end_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining_ms = (end_date - now).num_milliseconds();
    if remaining_ms <= 0 {
        return 0;
    }
    (remaining_ms + MS_PER_DAY - 1) / MS_PER_DAY
}

/// Single expiry definition shared by bookkeeping and feature gating.
///
/// A passed end date always wins. A cancelled plan whose end date is still
/// ahead stays usable until then.
pub fn canonical_status(
    end_date: DateTime<Utc>,
    status: RecordStatus,
    now: DateTime<Utc>,
) -> PlanStatus {
    if end_date < now {
        PlanStatus::Expired
    } else if status == RecordStatus::Cancelled {
        PlanStatus::CancelledGrace
    } else {
        PlanStatus::Active
    }
}

/// A zero price is always free. Otherwise the catalog flag decides, and the
/// name heuristic is only consulted when the catalog is silent.
pub fn classify_plan_type(
    plan_name: &str,
    price_cents: i64,
    catalog_is_free: Option<bool>,
) -> PlanType {
    if price_cents == 0 {
        return PlanType::Free;
    }
    let is_free = match catalog_is_free {
        Some(flag) => flag,
        None => {
            let name = plan_name.to_lowercase();
            FREE_PLAN_MARKERS.iter().any(|marker| name.contains(marker))
        }
    };
    if is_free { PlanType::Free } else { PlanType::Paid }
}

/// Long-form date, e.g. "October 26, 2026".
pub fn format_renewal_date(end_date: DateTime<Utc>) -> String {
    end_date.format("%B %-d, %Y").to_string()
}
