//! Database layer for the seller ranking engine

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

pub mod activity;
pub mod badges;
pub mod organizations;
pub mod participation;
pub mod settings;
pub mod snapshots;

#[cfg(test)]
mod organizations_test;

/// Create a database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    info!("Database connected");
    Ok(pool)
}

/// Run database migrations from SQL files
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Running migrations...");

    let migration_sql = include_str!("../../../migrations/001_initial.sql");
    sqlx::raw_sql(migration_sql).execute(pool).await?;

    info!("Migrations complete");
    Ok(())
}

/// Decode a text column into one of the domain enums
pub(crate) fn decode_label<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr<Err = common::Error>,
{
    value
        .parse()
        .map_err(|e: common::Error| sqlx::Error::Decode(Box::new(e)))
}
