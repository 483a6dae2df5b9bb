use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::plan_loader::LegacyPlanRepo,
    domain::entities::plan_record::RawLegacyPlanRecord,
};

// Legacy row as stored in the db.
#[derive(sqlx::FromRow, Debug)]
struct LegacyPlanDb {
    id: Uuid,
    user_id: Uuid,
    plan_name: Option<String>,
    start_date: Option<chrono::NaiveDateTime>,
    end_date: Option<chrono::NaiveDateTime>,
    duration_days: Option<i32>,
    created_at: Option<chrono::NaiveDateTime>,
}

impl From<LegacyPlanDb> for RawLegacyPlanRecord {
    fn from(row: LegacyPlanDb) -> Self {
        RawLegacyPlanRecord {
            id: row.id,
            user_id: row.user_id,
            plan_name: row.plan_name.unwrap_or_default(),
            start_date: row.start_date,
            end_date: row.end_date,
            duration_days: row.duration_days,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl LegacyPlanRepo for PostgresPersistence {
    async fn fetch_latest_legacy_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<RawLegacyPlanRecord>> {
        let row = sqlx::query_as::<_, LegacyPlanDb>(
            r#"
            SELECT id, user_id, plan_name, start_date, end_date, duration_days, created_at
            FROM user_subscriptions_legacy
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(RawLegacyPlanRecord::from))
    }
}
