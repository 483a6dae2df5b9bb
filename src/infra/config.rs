use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;

use crate::infra::sessions::SessionLimits;

pub const DEFAULT_BILLING_URL: &str = "/settings?tab=billing";

pub struct AppConfig {
    /// Postgres connection string. Holds credentials, never log it.
    pub database_url: SecretString,
    pub db_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Where the upgrade action of a denial notice sends the user.
    pub billing_url: String,
    /// Plans with this many days or fewer left are flagged as expiring soon.
    pub expiring_soon_days: i64,
    pub max_sessions: usize,
    /// Seconds a user session may sit untouched before it is dropped.
    pub session_idle_secs: u64,
}

impl AppConfig {
    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_sessions: self.max_sessions,
            idle_ttl: Duration::from_secs(self.session_idle_secs),
        }
    }

    pub fn from_env() -> Self {
        let database_url = SecretString::new(get_env::<String>("DATABASE_URL").into());
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);

        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
        );
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let billing_url: String = get_env_default("BILLING_URL", DEFAULT_BILLING_URL.to_string());
        let expiring_soon_days: i64 = get_env_default("EXPIRING_SOON_DAYS", 7);
        let max_sessions: usize = get_env_default("MAX_SESSIONS", 10_000);
        let session_idle_secs: u64 = get_env_default("SESSION_IDLE_SECS", 1_800);

        Self {
            database_url,
            db_max_connections,
            bind_addr,
            cors_origin,
            billing_url,
            expiring_soon_days,
            max_sessions,
            session_idle_secs,
        }
    }
}
