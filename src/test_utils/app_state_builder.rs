//! Minimal `AppState` for HTTP-level testing, backed by in-memory mocks.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::plan_loader::{CurrentPlanRepo, LegacyPlanRepo, PlanLoader},
    infra::{
        config::{AppConfig, DEFAULT_BILLING_URL},
        sessions::EntitlementSessions,
    },
    test_utils::RecordingEventSink,
};

pub fn create_test_config() -> AppConfig {
    AppConfig {
        database_url: SecretString::from("postgres://localhost/entitlements_test"),
        db_max_connections: 1,
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        billing_url: DEFAULT_BILLING_URL.to_string(),
        expiring_soon_days: 7,
        max_sessions: 100,
        session_idle_secs: 3_600,
    }
}

pub fn create_test_app_state(
    current: Arc<dyn CurrentPlanRepo>,
    legacy: Arc<dyn LegacyPlanRepo>,
) -> AppState {
    let config = create_test_config();
    let loader = Arc::new(PlanLoader::new(
        current,
        legacy,
        Arc::new(RecordingEventSink::new()),
        config.expiring_soon_days,
    ));
    let sessions = EntitlementSessions::new(
        loader,
        config.billing_url.clone(),
        config.session_limits(),
    );
    AppState {
        config: Arc::new(config),
        sessions: Arc::new(sessions),
    }
}
