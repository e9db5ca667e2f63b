pub mod postgres_connection;
pub mod repositories;
