use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    adapters::notices::TracingNoticeSink,
    application::use_cases::{entitlement::EntitlementUseCases, plan_loader::PlanLoader},
};

/// Bounds for the session registry.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    /// Upper bound on open sessions. The least recently used one is evicted
    /// to make room.
    pub max_sessions: usize,
    /// Sessions untouched for this long are dropped on the next insert.
    pub idle_ttl: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: 10_000,
            idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Entitlement state for one signed-in user: its own single-slot cache.
pub struct EntitlementSession {
    use_cases: EntitlementUseCases,
    last_tick: AtomicU64,
    last_seen: Mutex<Instant>,
}

impl EntitlementSession {
    pub fn use_cases(&self) -> &EntitlementUseCases {
        &self.use_cases
    }

    fn touch(&self, tick: u64) {
        self.last_tick.store(tick, Ordering::Relaxed);
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

/// Process-wide registry of sessions, keyed by user id.
pub struct EntitlementSessions {
    loader: Arc<PlanLoader>,
    billing_url: String,
    limits: SessionLimits,
    clock: AtomicU64,
    sessions: RwLock<HashMap<Uuid, Arc<EntitlementSession>>>,
}

impl EntitlementSessions {
    pub fn new(loader: Arc<PlanLoader>, billing_url: String, limits: SessionLimits) -> Self {
        Self {
            loader,
            billing_url,
            limits,
            clock: AtomicU64::new(0),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn next_tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn get_or_insert(&self, user_id: Uuid) -> Arc<EntitlementSession> {
        if let Some(session) = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
        {
            session.touch(self.next_tick());
            return session.clone();
        }

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = sessions.get(&user_id) {
            session.touch(self.next_tick());
            return session.clone();
        }

        self.make_room(&mut sessions);

        debug!(user_id = %user_id, "Opening entitlement session");
        let use_cases = EntitlementUseCases::new(
            self.loader.clone(),
            Arc::new(TracingNoticeSink::new()),
            self.billing_url.clone(),
        );
        use_cases.cache().switch_user(Some(user_id));
        let session = Arc::new(EntitlementSession {
            use_cases,
            last_tick: AtomicU64::new(self.next_tick()),
            last_seen: Mutex::new(Instant::now()),
        });
        sessions.insert(user_id, session.clone());
        session
    }

    /// Drops idle sessions, then the least recently used ones while full.
    fn make_room(&self, sessions: &mut HashMap<Uuid, Arc<EntitlementSession>>) {
        let before = sessions.len();
        let idle_ttl = self.limits.idle_ttl;
        sessions.retain(|_, session| session.idle_for() < idle_ttl);
        if sessions.len() < before {
            info!(evicted = before - sessions.len(), "Evicted idle entitlement sessions");
        }

        while !sessions.is_empty() && sessions.len() >= self.limits.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, session)| session.last_tick.load(Ordering::Relaxed))
                .map(|(user_id, _)| *user_id)
            else {
                break;
            };
            debug!(user_id = %oldest, "Session registry full, evicting least recently used");
            sessions.remove(&oldest);
        }
    }

    /// Returns the user's session, loading the plan on first access.
    ///
    /// A failed first load is recorded on the session (error flag) and the
    /// session still gates as "No Plan" until a later load succeeds.
    pub async fn open(&self, user_id: Uuid) -> Arc<EntitlementSession> {
        let session = self.get_or_insert(user_id);
        if let Err(err) = session.use_cases().ensure_loaded().await {
            warn!(user_id = %user_id, error = %err, "Initial plan load failed");
        }
        session
    }

    /// Drops the user's session. Returns false if none was open.
    pub fn close(&self, user_id: Uuid) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&user_id)
            .is_some()
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&user_id)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
