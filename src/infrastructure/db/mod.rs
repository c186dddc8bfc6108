use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::{Pool, Postgres};

pub type PgPool = Pool<Postgres>;

/// Compile-time embedded migrations under ./migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Builds the pool without opening a connection; connectivity problems
/// surface on first use instead of at startup.
pub fn connect_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)?;
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

pub mod migrations;
pub mod repositories;
