use anyhow::{Context, Result, bail};
use std::str::FromStr;

use super::config_model::{BackendServer, Database, DotEnvyConfig, Migrations};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup; `load` feeds it the process env.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let backend_server = BackendServer {
        port: parse_or(&lookup, "APP_PORT", 8080)?,
        body_limit: parse_or(&lookup, "SERVER_BODY_LIMIT", 1)?,
        timeout: parse_or(&lookup, "SERVER_TIMEOUT", 30)?,
    };

    let database = Database {
        host: required(&lookup, "DB_HOST")?,
        port: parse_or(&lookup, "DB_PORT", 5432)?,
        user: required(&lookup, "DB_USER")?,
        // Empty is allowed for trust/peer auth.
        password: lookup("DB_PASSWORD").unwrap_or_default(),
        name: required(&lookup, "DB_NAME")?,
        sslmode: non_empty(&lookup, "DB_SSLMODE").unwrap_or_else(|| "disable".to_string()),
        max_conns: parse_or(&lookup, "DB_MAX_CONNS", 5)?,
        min_conns: parse_or(&lookup, "DB_MIN_CONNS", 1)?,
    };

    if database.max_conns == 0 {
        bail!("DB_MAX_CONNS must be at least 1");
    }
    if database.min_conns > database.max_conns {
        bail!(
            "DB_MIN_CONNS ({}) cannot exceed DB_MAX_CONNS ({})",
            database.min_conns,
            database.max_conns
        );
    }

    let migrations = Migrations {
        path: non_empty(&lookup, "MIGRATION_PATH").unwrap_or_else(|| "./migrations".to_string()),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        migrations,
    })
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key).with_context(|| format!("{key} is required"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse().with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}
