use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewAccount, StoredUser, VerificationCode};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError>;

    /// Create the user and its verification atomically. A taken email yields
    /// `AuthError::Duplicate`.
    async fn create_user(&self, account: NewAccount) -> Result<(StoredUser, VerificationCode), AuthError>;

    /// Join users with verifications; both id and secret must match.
    async fn find_user_by_verification(&self, code: VerificationCode) -> Result<Option<StoredUser>, AuthError>;

    async fn mark_valid(&self, user_id: Uuid) -> Result<(), AuthError>;

    /// Replace the user's verification with a fresh (id, secret) pair.
    async fn reissue_verification(&self, user_id: Uuid) -> Result<VerificationCode, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, StoredUser>>,       // key: email
        codes: Mutex<HashMap<Uuid, VerificationCode>>,   // key: user_id
    }

    fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, AuthError> {
        m.lock().map_err(|_| AuthError::Repository("mock repository lock poisoned".into()))
    }

    fn fresh_code() -> VerificationCode {
        VerificationCode { id: Uuid::new_v4(), secret: Uuid::new_v4() }
    }

    impl MockAuthRepository {
        /// Number of stored users.
        pub fn user_count(&self) -> usize {
            self.users.lock().map(|u| u.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError> {
            Ok(lock(&self.users)?.get(email).cloned())
        }

        async fn create_user(&self, account: NewAccount) -> Result<(StoredUser, VerificationCode), AuthError> {
            let mut users = lock(&self.users)?;
            if users.contains_key(&account.email) {
                return Err(AuthError::Duplicate("email"));
            }
            let now = Utc::now();
            let user = StoredUser {
                id: Uuid::new_v4(),
                name: account.name,
                email: account.email,
                address: account.address,
                phone_number: account.phone_number,
                password_hash: account.password_hash,
                valid: false,
                created_at: now,
                updated_at: now,
            };
            let code = fresh_code();
            lock(&self.codes)?.insert(user.id, code);
            users.insert(user.email.clone(), user.clone());
            Ok((user, code))
        }

        async fn find_user_by_verification(&self, code: VerificationCode) -> Result<Option<StoredUser>, AuthError> {
            let owner = lock(&self.codes)?
                .iter()
                .find(|(_, c)| **c == code)
                .map(|(user_id, _)| *user_id);
            let Some(owner) = owner else { return Ok(None) };
            Ok(lock(&self.users)?.values().find(|u| u.id == owner).cloned())
        }

        async fn mark_valid(&self, user_id: Uuid) -> Result<(), AuthError> {
            let mut users = lock(&self.users)?;
            let user = users
                .values_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| AuthError::Repository("user not found".into()))?;
            user.valid = true;
            user.updated_at = Utc::now();
            Ok(())
        }

        async fn reissue_verification(&self, user_id: Uuid) -> Result<VerificationCode, AuthError> {
            let code = fresh_code();
            lock(&self.codes)?.insert(user_id, code);
            Ok(code)
        }
    }
}
