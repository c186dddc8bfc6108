use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationInfo {
    pub version: i64,
    pub description: String,
}

#[async_trait]
pub trait SchemaMigrations: Send + Sync {
    async fn pending(&self) -> anyhow::Result<Vec<MigrationInfo>>;
    async fn apply(&self) -> anyhow::Result<()>;
}
