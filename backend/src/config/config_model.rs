use infra::postgres::postgres_connection::PoolSettings;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub migrations: Migrations,
}

impl DotEnvyConfig {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            url: self.database.url(),
            max_size: self.database.max_conns,
            min_idle: self.database.min_conns,
            statement_timeout: Duration::from_secs(self.backend_server.timeout),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// Seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub sslmode: String,
    pub max_conns: u32,
    pub min_conns: u32,
}

impl Database {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.name, self.sslmode
        )
    }
}

#[derive(Debug, Clone)]
pub struct Migrations {
    pub path: String,
}
