use crate::{
    adapters::{events::TracingEventSink, http::app_state::AppState},
    application::{
        ports::plan_events::PlanEventSink,
        use_cases::plan_loader::{CurrentPlanRepo, LegacyPlanRepo, PlanLoader},
    },
    infra::{config::AppConfig, postgres_persistence, sessions::EntitlementSessions},
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config).await?);
    let events = Arc::new(TracingEventSink::new()) as Arc<dyn PlanEventSink>;

    let loader = Arc::new(PlanLoader::new(
        postgres_arc.clone() as Arc<dyn CurrentPlanRepo>,
        postgres_arc as Arc<dyn LegacyPlanRepo>,
        events,
        config.expiring_soon_days,
    ));

    let sessions = EntitlementSessions::new(
        loader,
        config.billing_url.clone(),
        config.session_limits(),
    );

    Ok(AppState {
        config: Arc::new(config),
        sessions: Arc::new(sessions),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "entitlements_api=debug,plan_events=info,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs), skipped when the file cannot be created
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
