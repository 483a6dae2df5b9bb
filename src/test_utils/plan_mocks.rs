//! In-memory mock implementations for the plan repository traits.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::plan_loader::{CurrentPlanRepo, LegacyPlanRepo},
    domain::entities::{
        plan_record::{RawCurrentPlanRecord, RawLegacyPlanRecord},
        plan_status::RecordStatus,
    },
};

/// In-memory implementation of CurrentPlanRepo for testing.
///
/// Applies the same filter as the Postgres query: active rows, plus cancelled
/// rows whose end date is still ahead, newest first.
#[derive(Default)]
pub struct InMemoryCurrentPlanRepo {
    pub records: Mutex<Vec<RawCurrentPlanRecord>>,
    calls: AtomicUsize,
}

impl InMemoryCurrentPlanRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial rows for testing.
    pub fn with_records(records: Vec<RawCurrentPlanRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches served (for test assertions).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn is_usable(record: &RawCurrentPlanRecord) -> bool {
    let now = Utc::now().naive_utc();
    match RecordStatus::from_text(&record.status) {
        RecordStatus::Active => true,
        RecordStatus::Cancelled => record.end_date.is_some_and(|end| end > now),
        RecordStatus::None => false,
    }
}

fn newest_active(records: &[RawCurrentPlanRecord], user_id: Uuid) -> Option<RawCurrentPlanRecord> {
    records
        .iter()
        .filter(|r| r.user_id == user_id && r.is_active && is_usable(r))
        .max_by_key(|r| r.created_at)
        .cloned()
}

#[async_trait]
impl CurrentPlanRepo for InMemoryCurrentPlanRepo {
    async fn fetch_active_current_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<RawCurrentPlanRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(newest_active(&self.records.lock().unwrap(), user_id))
    }
}

/// In-memory implementation of LegacyPlanRepo for testing.
#[derive(Default)]
pub struct InMemoryLegacyPlanRepo {
    pub records: Mutex<Vec<RawLegacyPlanRecord>>,
    calls: AtomicUsize,
}

impl InMemoryLegacyPlanRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial rows for testing.
    pub fn with_records(records: Vec<RawLegacyPlanRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LegacyPlanRepo for InMemoryLegacyPlanRepo {
    async fn fetch_latest_legacy_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<RawLegacyPlanRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| r.created_at)
            .cloned())
    }
}

/// CurrentPlanRepo whose fetches block until the test releases them.
///
/// Lets a test hold several loads in flight and control when they finish.
pub struct GatedCurrentPlanRepo {
    records: Vec<RawCurrentPlanRecord>,
    gate: Semaphore,
}

impl GatedCurrentPlanRepo {
    pub fn with_records(records: Vec<RawCurrentPlanRecord>) -> Self {
        Self {
            records,
            gate: Semaphore::new(0),
        }
    }

    /// Releases `n` pending or future fetches.
    pub fn open(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl CurrentPlanRepo for GatedCurrentPlanRepo {
    async fn fetch_active_current_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<RawCurrentPlanRecord>> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        permit.forget();
        Ok(newest_active(&self.records, user_id))
    }
}

/// Repository that fails every call, for both schemas.
pub struct FailingPlanRepo {
    message: String,
}

impl FailingPlanRepo {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl CurrentPlanRepo for FailingPlanRepo {
    async fn fetch_active_current_plan(
        &self,
        _user_id: Uuid,
    ) -> AppResult<Option<RawCurrentPlanRecord>> {
        Err(AppError::Repository(self.message.clone()))
    }
}

#[async_trait]
impl LegacyPlanRepo for FailingPlanRepo {
    async fn fetch_latest_legacy_plan(
        &self,
        _user_id: Uuid,
    ) -> AppResult<Option<RawLegacyPlanRecord>> {
        Err(AppError::Repository(self.message.clone()))
    }
}
