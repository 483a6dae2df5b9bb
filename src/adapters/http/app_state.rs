use std::sync::Arc;

use axum::extract::FromRef;

use crate::infra::{config::AppConfig, sessions::EntitlementSessions};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<EntitlementSessions>,
}

impl FromRef<AppState> for Arc<EntitlementSessions> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}
