use sqlx::PgPool;

use crate::app_error::AppError;

pub mod current_plan;
pub mod legacy_plan;

const MAX_JSON_LOG_LEN: usize = 200;

/// Decode a JSON column, falling back to the default on SQL NULL or on a
/// shape mismatch. Mismatches are logged with the owning row id.
pub fn parse_json_with_fallback<T: serde::de::DeserializeOwned + Default>(
    json: Option<&serde_json::Value>,
    field_name: &str,
    table: &str,
    row_id: &str,
) -> T {
    let Some(json) = json.filter(|v| !v.is_null()) else {
        return T::default();
    };

    serde_json::from_value(json.clone()).unwrap_or_else(|err| {
        let mut raw = json.to_string();
        if raw.len() > MAX_JSON_LOG_LEN {
            let cut = (0..=MAX_JSON_LOG_LEN)
                .rev()
                .find(|i| raw.is_char_boundary(*i))
                .unwrap_or(0);
            raw.truncate(cut);
            raw.push_str("...");
        }

        tracing::warn!(
            field = field_name,
            table = table,
            row_id = row_id,
            raw_json = %raw,
            error = %err,
            "Failed to parse JSON column, using default value"
        );
        T::default()
    })
}

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::ColumnDecode { index, .. } => {
                tracing::error!(error = ?err, column = %index, "Plan row failed to decode");
                AppError::Repository(format!("Unexpected value in column {}", index))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                tracing::error!(error = ?err, "Plan repository unreachable");
                AppError::Repository("Plan repository unreachable".into())
            }
            _ => {
                // Log the actual error for debugging, but don't expose details
                tracing::error!(error = ?err, "Database error");
                AppError::Repository("Database operation failed".into())
            }
        }
    }
}
