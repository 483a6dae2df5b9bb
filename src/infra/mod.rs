use secrecy::ExposeSecret;

use crate::{adapters::persistence::PostgresPersistence, infra::config::AppConfig, infra::db::init_db};

pub mod app;
pub mod config;
pub mod db;
pub mod sessions;
pub mod setup;

pub async fn postgres_persistence(config: &AppConfig) -> anyhow::Result<PostgresPersistence> {
    let pool = init_db(config.database_url.expose_secret(), config.db_max_connections).await?;
    let persistence = PostgresPersistence::new(pool);
    Ok(persistence)
}
