use configs::StorageConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;

/// Fresh in-memory sqlite database with the schema applied.
/// Pinned to one connection: each sqlite memory connection is a separate database.
pub async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let cfg = StorageConfig {
        url: "sqlite::memory:".into(),
        max_connections: 1,
        min_connections: 1,
        ..StorageConfig::default()
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
