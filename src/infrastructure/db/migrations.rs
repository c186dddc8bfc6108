use std::collections::HashSet;

use async_trait::async_trait;

use crate::application::ports::schema_migrations::{MigrationInfo, SchemaMigrations};
use crate::infrastructure::db::{MIGRATOR, PgPool, migrate};

// Postgres "undefined_table"
const UNDEFINED_TABLE: &str = "42P01";

pub struct SqlxSchemaMigrations {
    pub pool: PgPool,
}

impl SqlxSchemaMigrations {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaMigrations for SqlxSchemaMigrations {
    async fn pending(&self) -> anyhow::Result<Vec<MigrationInfo>> {
        let applied: HashSet<i64> = match sqlx::query_scalar::<_, i64>(
            "SELECT version FROM _sqlx_migrations WHERE success = TRUE",
        )
        .fetch_all(&self.pool)
        .await
        {
            Ok(versions) => versions.into_iter().collect(),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNDEFINED_TABLE) => {
                HashSet::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(MIGRATOR
            .iter()
            .filter(|m| !m.migration_type.is_down_migration())
            .filter(|m| !applied.contains(&m.version))
            .map(|m| MigrationInfo {
                version: m.version,
                description: m.description.to_string(),
            })
            .collect())
    }

    async fn apply(&self) -> anyhow::Result<()> {
        migrate(&self.pool).await
    }
}
