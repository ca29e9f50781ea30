use std::env;

use crate::error::ConfigError;

pub const DEFAULT_USER_TABLE: &str = "user_table";
pub const DEFAULT_ENTITY_TABLE: &str = "entityTable";
pub const DEFAULT_USERS_SQL_TABLE: &str = "z_users";

/// Settings read once at cold start.
///
/// `database_url` may carry credentials, so `Debug` redacts it.
#[derive(Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub user_table: String,
    pub entity_table: String,
    pub users_sql_table: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let users_sql_table =
            get("USERS_SQL_TABLE").unwrap_or_else(|| DEFAULT_USERS_SQL_TABLE.to_string());
        if !is_sql_identifier(&users_sql_table) {
            return Err(ConfigError::InvalidTableName {
                var: "USERS_SQL_TABLE",
                value: users_sql_table,
            });
        }

        Ok(Self {
            database_url: get("DATABASE_URL"),
            user_table: get("USER_TABLE").unwrap_or_else(|| DEFAULT_USER_TABLE.to_string()),
            entity_table: get("ENTITY_TABLE").unwrap_or_else(|| DEFAULT_ENTITY_TABLE.to_string()),
            users_sql_table,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("user_table", &self.user_table)
            .field("entity_table", &self.entity_table)
            .field("users_sql_table", &self.users_sql_table)
            .finish()
    }
}

// The table name is spliced into SQL text, so only `name` or `schema.name`
// made of ASCII alphanumerics and underscores is accepted.
fn is_sql_identifier(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            !part.is_empty()
                && !part.starts_with(|c: char| c.is_ascii_digit())
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
