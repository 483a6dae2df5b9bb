use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    app_error::AppResult,
    application::{
        ports::{notice_sink::NoticeSink, plan_events::PlanEventSink},
        use_cases::{
            feature_gate::{FeatureGateSet, gate},
            plan_loader::PlanLoader,
        },
    },
    domain::entities::{
        denial_notice::DenialNotice, feature::Feature, plan_event::PlanEvent,
        resolved_plan::ResolvedPlan,
    },
};

// ============================================================================
// Cache
// ============================================================================

#[derive(Debug, Default)]
struct CacheState {
    user_id: Option<Uuid>,
    plan: Option<ResolvedPlan>,
    loaded: bool,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

/// Identifies one in-flight load. Only the most recently started load for the
/// current user may write its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    user_id: Uuid,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheSnapshot {
    pub user_id: Option<Uuid>,
    pub plan: Option<ResolvedPlan>,
    pub loaded: bool,
    pub loading: bool,
    pub error: Option<String>,
}

/// Single-slot holder of the resolved plan for exactly one current user.
///
/// Switching users clears the slot. Results from loads that were superseded
/// (by a newer load or a user switch) are dropped.
#[derive(Debug, Default)]
pub struct EntitlementCache {
    state: Mutex<CacheState>,
}

impl EntitlementCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current_user(&self) -> Option<Uuid> {
        self.lock().user_id
    }

    /// Returns true when the user changed and the slot was cleared.
    pub fn switch_user(&self, user_id: Option<Uuid>) -> bool {
        let mut state = self.lock();
        if state.user_id == user_id {
            return false;
        }
        let generation = state.generation + 1;
        *state = CacheState {
            user_id,
            generation,
            ..CacheState::default()
        };
        true
    }

    pub fn begin_load(&self, user_id: Uuid) -> LoadTicket {
        let mut state = self.lock();
        state.generation += 1;
        state.loading = true;
        state.error = None;
        LoadTicket {
            user_id,
            generation: state.generation,
        }
    }

    fn is_current(state: &CacheState, ticket: LoadTicket) -> bool {
        state.generation == ticket.generation && state.user_id == Some(ticket.user_id)
    }

    /// Replaces the cached plan. Returns false if the ticket was superseded.
    pub fn complete(&self, ticket: LoadTicket, plan: Option<ResolvedPlan>) -> bool {
        let mut state = self.lock();
        if !Self::is_current(&state, ticket) {
            return false;
        }
        state.plan = plan;
        state.loaded = true;
        state.loading = false;
        true
    }

    /// Records a failed load. The previously cached plan is kept.
    pub fn fail(&self, ticket: LoadTicket, error: String) -> bool {
        let mut state = self.lock();
        if !Self::is_current(&state, ticket) {
            return false;
        }
        state.loading = false;
        state.error = Some(error);
        true
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let state = self.lock();
        CacheSnapshot {
            user_id: state.user_id,
            plan: state.plan.clone(),
            loaded: state.loaded,
            loading: state.loading,
            error: state.error.clone(),
        }
    }
}

// ============================================================================
// View Types
// ============================================================================

/// Everything the billing UI needs in one read.
#[derive(Debug, Clone, Serialize)]
pub struct EntitlementView {
    pub user_id: Option<Uuid>,
    pub plan: ResolvedPlan,
    pub has_plan_record: bool,
    pub status_description: &'static str,
    pub loading: bool,
    pub error: Option<String>,
    pub restrictions: FeatureGateSet,
}

// ============================================================================
// Use Cases
// ============================================================================

pub struct EntitlementUseCases {
    loader: Arc<PlanLoader>,
    cache: EntitlementCache,
    notices: Arc<dyn NoticeSink>,
    billing_url: String,
}

impl EntitlementUseCases {
    pub fn new(loader: Arc<PlanLoader>, notices: Arc<dyn NoticeSink>, billing_url: String) -> Self {
        Self {
            loader,
            cache: EntitlementCache::new(),
            notices,
            billing_url,
        }
    }

    fn events(&self) -> &Arc<dyn PlanEventSink> {
        self.loader.events()
    }

    pub fn cache(&self) -> &EntitlementCache {
        &self.cache
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Switches the current user and reloads when it changed.
    pub async fn set_current_user(&self, user_id: Option<Uuid>) -> AppResult<Option<ResolvedPlan>> {
        if !self.cache.switch_user(user_id) {
            return Ok(self.cache.snapshot().plan);
        }
        debug!(user_id = ?user_id, "Current user changed, entitlements invalidated");
        match user_id {
            Some(_) => self.load_current_plan(None).await,
            None => Ok(None),
        }
    }

    /// Loads the plan for `user_id`, or for the current user when `None`.
    ///
    /// Without any user this is a no-op. Repository failures set the error
    /// flag and propagate; the cached plan stays as it was.
    pub async fn load_current_plan(&self, user_id: Option<Uuid>) -> AppResult<Option<ResolvedPlan>> {
        let Some(user_id) = user_id.or_else(|| self.cache.current_user()) else {
            warn!("No user available, skipping plan load");
            return Ok(None);
        };
        if self.cache.current_user() != Some(user_id) {
            self.cache.switch_user(Some(user_id));
        }

        let ticket = self.cache.begin_load(user_id);
        match self.loader.load(user_id).await {
            Ok(plan) => {
                if !self.cache.complete(ticket, plan.clone()) {
                    debug!(user_id = %user_id, "Discarding superseded plan load");
                }
                Ok(plan)
            }
            Err(err) => {
                if !self.cache.fail(ticket, err.to_string()) {
                    debug!(user_id = %user_id, "Discarding superseded plan load failure");
                }
                Err(err)
            }
        }
    }

    /// Loads once per user; later calls reuse the cache until a trigger fires.
    pub async fn ensure_loaded(&self) -> AppResult<()> {
        let snapshot = self.cache.snapshot();
        if snapshot.loaded || snapshot.loading {
            return Ok(());
        }
        self.load_current_plan(None).await.map(|_| ())
    }

    pub async fn refresh_plan_status(&self) -> AppResult<()> {
        self.load_current_plan(None).await.map(|_| ())
    }

    pub async fn on_plan_upgraded(&self, old_plan_name: &str, new_plan_name: &str) -> AppResult<()> {
        let Some(user_id) = self.cache.current_user() else {
            warn!("Plan upgrade reported without a current user");
            return Ok(());
        };
        self.events().emit(PlanEvent::PlanUpgraded {
            old_plan_name: old_plan_name.to_string(),
            new_plan_name: new_plan_name.to_string(),
            user_id,
        });
        self.refresh_plan_status().await
    }

    pub async fn on_plan_cancelled(&self, plan_name: &str) -> AppResult<()> {
        let Some(user_id) = self.cache.current_user() else {
            warn!("Plan cancellation reported without a current user");
            return Ok(());
        };
        self.events().emit(PlanEvent::PlanCancelled {
            plan_name: plan_name.to_string(),
            user_id,
        });
        self.refresh_plan_status().await
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The cached plan, or the "No Plan" state when nothing is cached.
    pub fn current_plan(&self) -> ResolvedPlan {
        self.cache
            .snapshot()
            .plan
            .unwrap_or_else(|| ResolvedPlan::no_plan(Utc::now()))
    }

    pub fn restrictions(&self) -> FeatureGateSet {
        let plan = self.current_plan();
        gate(plan.is_expired, plan.plan_type)
    }

    pub fn status_view(&self) -> EntitlementView {
        let snapshot = self.cache.snapshot();
        let has_plan_record = snapshot.plan.as_ref().is_some_and(|p| !p.is_no_plan());
        let plan = snapshot
            .plan
            .unwrap_or_else(|| ResolvedPlan::no_plan(Utc::now()));
        EntitlementView {
            user_id: snapshot.user_id,
            restrictions: gate(plan.is_expired, plan.plan_type),
            status_description: plan.plan_status.description(),
            plan,
            has_plan_record,
            loading: snapshot.loading,
            error: snapshot.error,
        }
    }

    // ========================================================================
    // Access Enforcement
    // ========================================================================

    /// Returns whether the current user may use `feature`. A denial delivers
    /// exactly one notice naming `feature_label`.
    pub fn check_feature_access(&self, feature: Feature, feature_label: &str) -> bool {
        self.check_feature_access_with(feature, feature_label, self.notices.as_ref())
    }

    /// Same as [`Self::check_feature_access`], delivering into the caller's
    /// sink. Concurrent callers never see each other's notices.
    pub fn check_feature_access_with(
        &self,
        feature: Feature,
        feature_label: &str,
        notices: &dyn NoticeSink,
    ) -> bool {
        let restrictions = self.restrictions();
        if restrictions.allows(feature) {
            return true;
        }
        debug!(feature = %feature, "Feature access denied");
        notices.deliver(DenialNotice::feature_restricted(
            feature_label,
            restrictions.restriction_reason.as_deref(),
            &self.billing_url,
        ));
        false
    }

    pub fn show_upgrade_prompt(&self, feature_label: &str) {
        self.show_upgrade_prompt_with(feature_label, self.notices.as_ref());
    }

    pub fn show_upgrade_prompt_with(&self, feature_label: &str, notices: &dyn NoticeSink) {
        notices.deliver(DenialNotice::upgrade_prompt(feature_label, &self.billing_url));
    }
}
