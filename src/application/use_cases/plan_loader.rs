use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::{
        ports::plan_events::PlanEventSink,
        use_cases::plan_status::{StatusInput, compute_status},
    },
    domain::entities::{
        plan_event::PlanEvent,
        plan_record::{RawCurrentPlanRecord, RawLegacyPlanRecord},
        plan_status::{PlanSource, RecordStatus},
        resolved_plan::ResolvedPlan,
    },
};

/// Legacy rows carry no price; this name marks the free beta cohort.
const LEGACY_FREE_PLAN_NAME: &str = "Beta Trial";
const LEGACY_PAID_PRICE_CENTS: i64 = 4_900;
const LEGACY_CURRENCY: &str = "usd";

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait CurrentPlanRepo: Send + Sync {
    /// Newest row with `is_active = true` that is either active or cancelled
    /// with its end date still ahead, catalog joined.
    async fn fetch_active_current_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<RawCurrentPlanRecord>>;
}

#[async_trait]
pub trait LegacyPlanRepo: Send + Sync {
    /// Newest legacy row, no status filter.
    async fn fetch_latest_legacy_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<RawLegacyPlanRecord>>;
}

// ============================================================================
// Resolver Chain
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ResolvedPlan),
    /// A row exists but cannot be normalized.
    Malformed { reason: String },
    NotFound,
}

/// One schema in the precedence chain.
#[async_trait]
pub trait PlanResolver: Send + Sync {
    fn source(&self) -> PlanSource;

    async fn resolve(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Resolution>;
}

pub struct CurrentSchemaResolver {
    repo: Arc<dyn CurrentPlanRepo>,
    expiring_soon_days: i64,
}

impl CurrentSchemaResolver {
    pub fn new(repo: Arc<dyn CurrentPlanRepo>, expiring_soon_days: i64) -> Self {
        Self {
            repo,
            expiring_soon_days,
        }
    }
}

#[async_trait]
impl PlanResolver for CurrentSchemaResolver {
    fn source(&self) -> PlanSource {
        PlanSource::Current
    }

    async fn resolve(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Resolution> {
        let Some(record) = self.repo.fetch_active_current_plan(user_id).await? else {
            return Ok(Resolution::NotFound);
        };
        Ok(match normalize_current(&record, now, self.expiring_soon_days) {
            Ok(plan) => Resolution::Resolved(plan),
            Err(reason) => Resolution::Malformed { reason },
        })
    }
}

pub struct LegacySchemaResolver {
    repo: Arc<dyn LegacyPlanRepo>,
    expiring_soon_days: i64,
}

impl LegacySchemaResolver {
    pub fn new(repo: Arc<dyn LegacyPlanRepo>, expiring_soon_days: i64) -> Self {
        Self {
            repo,
            expiring_soon_days,
        }
    }
}

#[async_trait]
impl PlanResolver for LegacySchemaResolver {
    fn source(&self) -> PlanSource {
        PlanSource::Legacy
    }

    async fn resolve(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Resolution> {
        let Some(record) = self.repo.fetch_latest_legacy_plan(user_id).await? else {
            return Ok(Resolution::NotFound);
        };
        Ok(match normalize_legacy(&record, now, self.expiring_soon_days) {
            Ok(plan) => Resolution::Resolved(plan),
            Err(reason) => Resolution::Malformed { reason },
        })
    }
}

// ============================================================================
// Normalization
// ============================================================================

struct PlanParts<'a> {
    plan_name: &'a str,
    price_cents: i64,
    currency: &'a str,
    catalog_is_free: Option<bool>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    status: RecordStatus,
    source: PlanSource,
}

fn build_plan(
    parts: PlanParts<'_>,
    now: DateTime<Utc>,
    expiring_soon_days: i64,
) -> ResolvedPlan {
    let snapshot = compute_status(
        &StatusInput {
            plan_name: parts.plan_name,
            price_cents: parts.price_cents,
            catalog_is_free: parts.catalog_is_free,
            end_date: parts.end_date,
            status: parts.status,
        },
        now,
    );
    ResolvedPlan {
        plan_name: parts.plan_name.to_string(),
        price_cents: parts.price_cents,
        currency: parts.currency.to_string(),
        start_date: parts.start_date,
        end_date: parts.end_date,
        status: parts.status,
        plan_type: snapshot.plan_type,
        plan_status: snapshot.plan_status,
        is_expired: snapshot.is_expired,
        days_remaining: snapshot.days_remaining,
        is_expiring_soon: snapshot.is_expiring_soon(expiring_soon_days),
        renewal_date: snapshot.renewal_date,
        source: parts.source,
        features: Vec::new(),
        billing: None,
    }
}

/// Missing start dates are reconstructed from the end date and duration.
fn start_or_derived(
    start: Option<NaiveDateTime>,
    end: DateTime<Utc>,
    duration_days: Option<i32>,
) -> DateTime<Utc> {
    match (start, duration_days) {
        (Some(start), _) => start.and_utc(),
        (None, Some(days)) => end - Duration::days(i64::from(days)),
        (None, None) => end,
    }
}

pub fn normalize_current(
    record: &RawCurrentPlanRecord,
    now: DateTime<Utc>,
    expiring_soon_days: i64,
) -> Result<ResolvedPlan, String> {
    let catalog = record
        .plan
        .as_ref()
        .ok_or_else(|| format!("plan {} has no catalog entry", record.plan_id))?;
    let end_date = record
        .end_date
        .ok_or_else(|| format!("current plan {} has no end date", record.id))?
        .and_utc();

    let mut plan = build_plan(
        PlanParts {
            plan_name: &catalog.name,
            price_cents: i64::from(catalog.price_cents),
            currency: &catalog.currency,
            catalog_is_free: catalog.is_free,
            start_date: start_or_derived(record.start_date, end_date, Some(catalog.duration_days)),
            end_date,
            status: RecordStatus::from_text(&record.status),
            source: PlanSource::Current,
        },
        now,
        expiring_soon_days,
    );
    plan.features = catalog.features.clone();
    plan.billing = Some(record.billing.clone());
    Ok(plan)
}

pub fn normalize_legacy(
    record: &RawLegacyPlanRecord,
    now: DateTime<Utc>,
    expiring_soon_days: i64,
) -> Result<ResolvedPlan, String> {
    if record.plan_name.trim().is_empty() {
        return Err(format!("legacy plan {} has no name", record.id));
    }
    let end_date = record
        .end_date
        .ok_or_else(|| format!("legacy plan {} has no end date", record.id))?
        .and_utc();

    Ok(build_plan(
        PlanParts {
            plan_name: &record.plan_name,
            price_cents: legacy_price_cents(&record.plan_name),
            currency: LEGACY_CURRENCY,
            catalog_is_free: None,
            start_date: start_or_derived(record.start_date, end_date, record.duration_days),
            end_date,
            // Legacy rows have no status column; presence means active.
            status: RecordStatus::Active,
            source: PlanSource::Legacy,
        },
        now,
        expiring_soon_days,
    ))
}

pub fn legacy_price_cents(plan_name: &str) -> i64 {
    if plan_name == LEGACY_FREE_PLAN_NAME {
        0
    } else {
        LEGACY_PAID_PRICE_CENTS
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Fetches the authoritative plan for a user. The first resolver in the chain
/// that finds a row wins; rows are never merged across schemas.
pub struct PlanLoader {
    resolvers: Vec<Arc<dyn PlanResolver>>,
    events: Arc<dyn PlanEventSink>,
}

impl PlanLoader {
    /// Current schema first, legacy as fallback.
    pub fn new(
        current_repo: Arc<dyn CurrentPlanRepo>,
        legacy_repo: Arc<dyn LegacyPlanRepo>,
        events: Arc<dyn PlanEventSink>,
        expiring_soon_days: i64,
    ) -> Self {
        Self::with_resolvers(
            vec![
                Arc::new(CurrentSchemaResolver::new(current_repo, expiring_soon_days)),
                Arc::new(LegacySchemaResolver::new(legacy_repo, expiring_soon_days)),
            ],
            events,
        )
    }

    pub fn with_resolvers(
        resolvers: Vec<Arc<dyn PlanResolver>>,
        events: Arc<dyn PlanEventSink>,
    ) -> Self {
        Self { resolvers, events }
    }

    pub fn events(&self) -> &Arc<dyn PlanEventSink> {
        &self.events
    }

    /// Returns `Ok(None)` when neither schema has a row for the user.
    /// A malformed row resolves to the "No Plan" state instead of failing.
    pub async fn load(&self, user_id: Uuid) -> AppResult<Option<ResolvedPlan>> {
        let now = Utc::now();

        for resolver in &self.resolvers {
            let source = resolver.source();
            let resolution = match resolver.resolve(user_id, now).await {
                Ok(resolution) => resolution,
                Err(err) => {
                    warn!(user_id = %user_id, source = %source, error = %err, "Plan load failed");
                    self.events.emit(PlanEvent::PlanLoadFailed {
                        user_id,
                        error: err.to_string(),
                    });
                    return Err(err);
                }
            };

            match resolution {
                Resolution::Resolved(plan) => {
                    info!(
                        user_id = %user_id,
                        source = %source,
                        plan_name = %plan.plan_name,
                        plan_status = %plan.plan_status,
                        "Resolved plan"
                    );
                    let event = match source {
                        PlanSource::Legacy => PlanEvent::legacy_plan_loaded(&plan),
                        _ => PlanEvent::plan_loaded(&plan),
                    };
                    self.events.emit(event);
                    return Ok(Some(plan));
                }
                Resolution::Malformed { reason } => {
                    warn!(
                        user_id = %user_id,
                        source = %source,
                        reason = %reason,
                        "Malformed plan record, treating as no plan"
                    );
                    return Ok(Some(ResolvedPlan::no_plan(now)));
                }
                Resolution::NotFound => {
                    debug!(user_id = %user_id, source = %source, "No plan record in source");
                }
            }
        }

        Ok(None)
    }
}
