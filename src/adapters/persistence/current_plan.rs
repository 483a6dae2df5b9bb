use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_json_with_fallback},
    app_error::{AppError, AppResult},
    application::use_cases::plan_loader::CurrentPlanRepo,
    domain::entities::plan_record::{BillingMetadata, PlanCatalogEntry, RawCurrentPlanRecord},
};

// Joined catalog columns as read from the row. Every column is nullable here:
// the join may find nothing, and older catalog rows have gaps.
#[derive(Debug, Default)]
struct CatalogColumns {
    id: Option<Uuid>,
    name: Option<String>,
    description: Option<String>,
    price_cents: Option<i32>,
    currency: Option<String>,
    duration_days: Option<i32>,
    features: Option<serde_json::Value>,
    is_free: Option<bool>,
}

impl CatalogColumns {
    fn read(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("p_id")?,
            name: row.try_get("p_name")?,
            description: row.try_get("p_description")?,
            price_cents: row.try_get("p_price_cents")?,
            currency: row.try_get("p_currency")?,
            duration_days: row.try_get("p_duration_days")?,
            features: row.try_get("p_features")?,
            is_free: row.try_get("p_is_free")?,
        })
    }

    /// `None` when the join found nothing or a required column is NULL. The
    /// loader then treats the record as malformed.
    fn into_entry(self) -> Option<PlanCatalogEntry> {
        let id = self.id?;
        let (Some(name), Some(price_cents), Some(currency), Some(duration_days)) =
            (self.name, self.price_cents, self.currency, self.duration_days)
        else {
            tracing::warn!(plan_id = %id, "Catalog entry has NULL required columns");
            return None;
        };

        Some(PlanCatalogEntry {
            id,
            name,
            description: self.description,
            price_cents,
            currency,
            duration_days,
            features: parse_json_with_fallback(
                self.features.as_ref(),
                "features",
                "plans",
                &id.to_string(),
            ),
            is_free: self.is_free,
        })
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<RawCurrentPlanRecord, sqlx::Error> {
    Ok(RawCurrentPlanRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        plan_id: row.try_get("plan_id")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        is_active: row.try_get::<Option<bool>, _>("is_active")?.unwrap_or(false),
        status: row.try_get::<Option<String>, _>("status")?.unwrap_or_default(),
        billing: BillingMetadata {
            subscription_id: row.try_get("subscription_id")?,
            invoice_id: row.try_get("invoice_id")?,
            amount_cents: row.try_get("amount_cents")?,
            currency: row.try_get("currency")?,
            receipt_url: row.try_get("receipt_url")?,
            invoice_url: row.try_get("invoice_url")?,
        },
        plan: CatalogColumns::read(row)?.into_entry(),
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl CurrentPlanRepo for PostgresPersistence {
    async fn fetch_active_current_plan(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<RawCurrentPlanRecord>> {
        // Cancelled rows stay visible until their end date so the grace
        // period can be computed.
        let row = sqlx::query(
            r#"
            SELECT
                up.id, up.user_id, up.plan_id, up.start_date, up.end_date, up.is_active, up.status,
                up.subscription_id, up.invoice_id, up.amount_cents, up.currency,
                up.receipt_url, up.invoice_url, up.created_at,
                p.id AS p_id, p.name AS p_name, p.description AS p_description,
                p.price_cents AS p_price_cents, p.currency AS p_currency,
                p.duration_days AS p_duration_days, p.features AS p_features,
                p.is_free AS p_is_free
            FROM user_plans up
            LEFT JOIN plans p ON p.id = up.plan_id
            WHERE up.user_id = $1
              AND up.is_active = true
              AND (
                LOWER(TRIM(up.status)) = 'active'
                OR (
                  LOWER(TRIM(up.status)) IN ('cancelled', 'canceled')
                  AND up.end_date > (NOW() AT TIME ZONE 'utc')
                )
              )
            ORDER BY up.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        row.as_ref()
            .map(row_to_record)
            .transpose()
            .map_err(AppError::from)
    }
}
