use chrono::Utc;
use models::errors::ModelError;
use models::{user, verification};
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::auth::domain::{NewAccount, StoredUser, VerificationCode};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<user::Model> for StoredUser {
    fn from(u: user::Model) -> Self {
        StoredUser {
            id: u.id,
            name: u.name,
            email: u.email,
            address: u.address,
            phone_number: u.phone_number,
            password_hash: u.password,
            valid: u.valid,
            created_at: u.created_at.with_timezone(&Utc),
            updated_at: u.updated_at.with_timezone(&Utc),
        }
    }
}

fn code_of(v: &verification::Model) -> VerificationCode {
    VerificationCode { id: v.id, secret: v.secret }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError> {
        let found = user::find_by_email(&self.db, email).await?;
        Ok(found.map(StoredUser::from))
    }

    async fn create_user(&self, account: NewAccount) -> Result<(StoredUser, VerificationCode), AuthError> {
        let new = user::NewUser {
            name: account.name,
            email: account.email,
            address: account.address,
            phone_number: account.phone_number,
            password: account.password_hash,
        };
        let (created, code) = user::create_with_verification(&self.db, new).await?;
        Ok((created.into(), code_of(&code)))
    }

    async fn find_user_by_verification(&self, code: VerificationCode) -> Result<Option<StoredUser>, AuthError> {
        let found = user::find_by_verification(&self.db, code.id, code.secret).await?;
        Ok(found.map(StoredUser::from))
    }

    async fn mark_valid(&self, user_id: Uuid) -> Result<(), AuthError> {
        user::mark_valid(&self.db, user_id).await?;
        Ok(())
    }

    async fn reissue_verification(&self, user_id: Uuid) -> Result<VerificationCode, AuthError> {
        let txn = self.db.begin().await.map_err(ModelError::from)?;
        let fresh = verification::reissue(&txn, user_id).await?;
        txn.commit().await.map_err(ModelError::from)?;
        Ok(code_of(&fresh))
    }
}
