use anyhow::{Context, Result, anyhow};
use diesel::{
    PgConnection,
    connection::{CacheSize, Connection, SimpleConnection},
    r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use diesel_migrations::{FileBasedMigrations, MigrationHarness};
use std::time::Duration;
use tracing::info;

pub type PgPoolSquad = Pool<ConnectionManager<PgConnection>>;

#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_size: u32,
    pub min_idle: u32,
    /// Upper bound for a single statement; queries whose request was
    /// abandoned are cut off by Postgres once this elapses.
    pub statement_timeout: Duration,
}

#[derive(Debug)]
struct SessionDefaults {
    statement_timeout: Duration,
}

impl CustomizeConnection<PgConnection, R2d2Error> for SessionDefaults {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        conn.batch_execute(&format!(
            "SET statement_timeout = {}",
            self.statement_timeout.as_millis()
        ))
        .map_err(R2d2Error::QueryError)?;
        Ok(())
    }
}

pub fn establish_connection(settings: &PoolSettings) -> Result<PgPoolSquad> {
    let manager = ConnectionManager::<PgConnection>::new(&settings.url);
    let pool = Pool::builder()
        .max_size(settings.max_size)
        .min_idle(Some(settings.min_idle))
        .max_lifetime(Some(Duration::from_secs(60 * 60)))
        .connection_customizer(Box::new(SessionDefaults {
            statement_timeout: settings.statement_timeout,
        }))
        .build(manager)?;
    Ok(pool)
}

pub fn run_migrations(db_pool: &PgPoolSquad, migrations_path: &str) -> Result<()> {
    let migrations = FileBasedMigrations::from_path(migrations_path)
        .with_context(|| format!("failed to locate migrations in {migrations_path}"))?;

    let mut pooled = db_pool.get()?;
    let conn: &mut PgConnection = &mut pooled;
    let applied = conn
        .run_pending_migrations(migrations)
        .map_err(|err| anyhow!("failed to run migrations: {err}"))?;

    info!(applied = applied.len(), "postgres: migrations applied");
    Ok(())
}
