

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::connect_memory;
use crate::user::NewUser;

/// Fresh in-memory database with the real schema applied.
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub(crate) fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "alice123".into(),
        email: email.into(),
        address: "1 Rd".into(),
        phone_number: "5551234".into(),
        password: "$2b$04$hashplaceholder".into(),
    }
}
