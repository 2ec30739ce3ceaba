use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Server-side lifetime of a session when "remember me" is not set.
    pub ttl_hours: i64,
    /// Extended lifetime applied when the user ticks "remember me".
    pub remember_ttl_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(12),
            remember_ttl_days: std::env::var("REMEMBER_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(14),
        };
        let mail_from = std::env::var("MAIL_FROM")
            .unwrap_or_else(|_| "no-reply@stockfolio.local".into());
        Ok(Self {
            database_url,
            session,
            mail_from,
        })
    }
}
