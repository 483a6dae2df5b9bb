pub mod entitlement;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/entitlements", entitlement::router())
}
