use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::{http::app_state::AppState, notices::NoticeQueue},
    app_error::{AppError, AppResult},
    application::use_cases::entitlement::EntitlementView,
    domain::entities::{denial_notice::DenialNotice, feature::Feature},
};

#[derive(Deserialize)]
struct CheckPayload {
    feature: String,
    label: Option<String>,
}

#[derive(Deserialize)]
struct UpgradePromptPayload {
    label: String,
}

#[derive(Deserialize)]
struct UpgradedPayload {
    old_plan_name: String,
    new_plan_name: String,
}

#[derive(Deserialize)]
struct CancelledPayload {
    plan_name: String,
}

#[derive(Serialize)]
struct CheckResponse {
    allowed: bool,
    notices: Vec<DenialNotice>,
}

#[derive(Serialize)]
struct NoticesResponse {
    notices: Vec<DenialNotice>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{user_id}", get(status).delete(close_session))
        .route("/{user_id}/refresh", post(refresh))
        .route("/{user_id}/check", post(check_access))
        .route("/{user_id}/upgrade-prompt", post(upgrade_prompt))
        .route("/{user_id}/events/upgraded", post(plan_upgraded))
        .route("/{user_id}/events/cancelled", post(plan_cancelled))
}

async fn status(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<EntitlementView>> {
    let session = app_state.sessions.open(user_id).await;
    Ok(Json(session.use_cases().status_view()))
}

async fn refresh(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<EntitlementView>> {
    let session = app_state.sessions.open(user_id).await;
    session.use_cases().refresh_plan_status().await?;
    Ok(Json(session.use_cases().status_view()))
}

async fn check_access(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CheckPayload>,
) -> AppResult<Json<CheckResponse>> {
    let feature: Feature = payload
        .feature
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Unknown feature: {}", payload.feature)))?;
    let label = payload.label.unwrap_or_else(|| feature.to_string());

    let session = app_state.sessions.open(user_id).await;
    let notices = NoticeQueue::new();
    let allowed = session
        .use_cases()
        .check_feature_access_with(feature, &label, &notices);

    Ok(Json(CheckResponse {
        allowed,
        notices: notices.drain(),
    }))
}

async fn upgrade_prompt(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpgradePromptPayload>,
) -> AppResult<Json<NoticesResponse>> {
    if payload.label.trim().is_empty() {
        return Err(AppError::InvalidInput("label must not be empty".into()));
    }

    let session = app_state.sessions.open(user_id).await;
    let notices = NoticeQueue::new();
    session
        .use_cases()
        .show_upgrade_prompt_with(&payload.label, &notices);

    Ok(Json(NoticesResponse {
        notices: notices.drain(),
    }))
}

async fn plan_upgraded(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpgradedPayload>,
) -> AppResult<Json<EntitlementView>> {
    let session = app_state.sessions.open(user_id).await;
    session
        .use_cases()
        .on_plan_upgraded(&payload.old_plan_name, &payload.new_plan_name)
        .await?;
    Ok(Json(session.use_cases().status_view()))
}

async fn plan_cancelled(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CancelledPayload>,
) -> AppResult<Json<EntitlementView>> {
    let session = app_state.sessions.open(user_id).await;
    session
        .use_cases()
        .on_plan_cancelled(&payload.plan_name)
        .await?;
    Ok(Json(session.use_cases().status_view()))
}

/// Signs the user out of entitlement tracking.
async fn close_session(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !app_state.sessions.close(user_id) {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
