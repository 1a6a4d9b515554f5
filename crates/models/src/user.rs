use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::verification;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub address: String,
    pub phone_number: String,
    /// bcrypt hash, never the plaintext.
    pub password: String,
    pub valid: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Verification,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Verification => Entity::has_one(verification::Entity).into(),
        }
    }
}

impl Related<verification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Verification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields supplied at registration; `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub password: String,
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

/// Insert the user and its verification record in one transaction.
///
/// A taken email surfaces as `ModelError::Conflict` from the unique index.
pub async fn create_with_verification(
    db: &DatabaseConnection,
    new: NewUser,
) -> Result<(Model, verification::Model), ModelError> {
    if new.password.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let txn = db.begin().await?;
    let user = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(new.name),
        email: Set(new.email),
        address: Set(new.address),
        phone_number: Set(new.phone_number),
        password: Set(new.password),
        valid: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    let code = verification::new_active(user.id).insert(&txn).await?;
    txn.commit().await?;
    Ok((user, code))
}

/// Owner of the verification whose id and secret both match.
pub async fn find_by_verification<C: ConnectionTrait>(
    db: &C,
    base: Uuid,
    secret: Uuid,
) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .inner_join(verification::Entity)
        .filter(verification::Column::Id.eq(base))
        .filter(verification::Column::Secret.eq(secret))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn mark_valid<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::Validation("user not found".into()))?
        .into();
    found.valid = Set(true);
    found.updated_at = Set(Utc::now().into());
    found.update(db).await?;
    Ok(())
}
