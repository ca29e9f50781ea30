//! Optional relational copy of registered users.
//!
//! The directory is best-effort: if it cannot be reached at cold start the
//! lambda runs without it, and insert failures never fail an invocation.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::types::RelationalUser;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Insert the user row. `Ok(None)` means the subject id was already
    /// present and nothing was written.
    async fn insert_user(&self, user: &RelationalUser) -> Result<Option<String>, sqlx::Error>;
}

pub struct PgUserDirectory {
    pool: PgPool,
    insert_sql: String,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            insert_sql: insert_sql(table),
        }
    }

    /// Connect and ping once. Returns `None` when no URL is configured or
    /// the database is unreachable; the caller keeps the relational path
    /// disabled for the life of the process.
    pub async fn connect(config: &Config) -> Option<Self> {
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!("DATABASE_URL not set, skipping PostgreSQL initialization");
            return None;
        };

        let pool = match PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!("Failed to connect to PostgreSQL database: {}", e);
                return None;
            }
        };

        if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
            tracing::error!("Failed to ping PostgreSQL database: {}", e);
            pool.close().await;
            return None;
        }

        tracing::info!("Successfully connected to PostgreSQL database");
        Some(Self::new(pool, &config.users_sql_table))
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn insert_user(&self, user: &RelationalUser) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(&self.insert_sql)
            .bind(&user.cognito_id)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(user.role.as_str())
            .fetch_optional(&self.pool)
            .await
    }
}

// `table` is validated as a plain identifier by `Config`.
fn insert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} (cognito_id, email, phone, role) VALUES ($1, $2, $3, $4) \
         ON CONFLICT (cognito_id) DO NOTHING RETURNING user_id::text"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_targets_configured_table() {
        assert_eq!(
            insert_sql("public.z_users"),
            "INSERT INTO public.z_users (cognito_id, email, phone, role) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (cognito_id) DO NOTHING RETURNING user_id::text"
        );
    }

    #[tokio::test]
    async fn test_connect_without_url_disables_directory() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert!(PgUserDirectory::connect(&config).await.is_none());
    }
}
