#![cfg(test)]
use migration::MigratorTrait;
use models::db::connect_memory;
use sea_orm::DatabaseConnection;

/// Each test gets its own in-memory database with migrations applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
