use std::sync::Arc;

use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{
    present, AuthSession, CheckedInput, Claims, LoginInput, NewAccount, RegisterInput, Registered,
    ResendInput, VerificationCode, VerifyInput,
};
use super::errors::AuthError;
use super::notifier::{LogNotifier, VerificationNotifier};
use super::repository::AuthRepository;

/// Auth service configuration, injected at construction.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// bcrypt work factor
    pub hash_cost: u32,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    notifier: Arc<dyn VerificationNotifier>,
    cfg: AuthConfig,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, notifier: Arc::new(LogNotifier), cfg }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn VerificationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Register a new, not yet verified user.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), hash_cost: 4 });
    /// let input = RegisterInput {
    ///     email: Some("user@example.com".into()),
    ///     name: Some("alice123".into()),
    ///     address: Some("1 Rd".into()),
    ///     phone_number: Some("5551234".into()),
    ///     password: Some("secret1".into()),
    ///     ..Default::default()
    /// };
    /// let out = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(out.user.email, "user@example.com");
    /// assert_eq!(out.user.valid, Some(false));
    /// ```
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<Registered, AuthError> {
        input.check()?;
        let email = present(input.email, "email")?;
        let password = present(input.password, "password")?;

        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            debug!(user_id = %existing.id, "email already registered");
            return Err(AuthError::Duplicate("email"));
        }

        let password_hash = self.hash_password(password).await?;
        let account = NewAccount {
            name: present(input.name, "name")?,
            email,
            address: present(input.address, "address")?,
            phone_number: present(input.phone_number, "phone_number")?,
            password_hash,
        };
        let (user, code) = self.repo.create_user(account).await?;
        self.deliver(&user.email, &code).await;

        info!(user_id = %user.id, "user_registered");
        Ok(Registered { user: user.registered_view(code) })
    }

    /// Check credentials of a verified user and issue a token.
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        input.check()?;
        let email = present(input.email, "email")?;
        let password = present(input.password, "password")?;

        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound("email"))?;

        if !self.verify_password(password, user.password_hash.clone()).await? {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.valid {
            return Err(AuthError::Unverified);
        }

        let token = self.issue_token(user.id)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { token, user: user.public_view() })
    }

    /// Mark the owner of a matching (base, secret) pair as verified.
    #[instrument(skip(self, input))]
    pub async fn verify(&self, input: VerifyInput) -> Result<(), AuthError> {
        input.check()?;
        let base = present(input.base, "base")?;
        let secret = present(input.secret, "secret")?;

        // values that are not ids cannot match any record
        let (Ok(id), Ok(secret)) = (Uuid::parse_str(&base), Uuid::parse_str(&secret)) else {
            return Err(AuthError::InvalidVerification);
        };
        let user = self
            .repo
            .find_user_by_verification(VerificationCode { id, secret })
            .await?
            .ok_or(AuthError::InvalidVerification)?;

        self.repo.mark_valid(user.id).await?;
        info!(user_id = %user.id, "user_verified");
        Ok(())
    }

    /// Issue a new verification pair, invalidating the previous one.
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn resend(&self, input: ResendInput) -> Result<(), AuthError> {
        input.check()?;
        let email = present(input.email, "email")?;

        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound("email"))?;

        let code = self.repo.reissue_verification(user.id).await?;
        self.deliver(&user.email, &code).await;
        info!(user_id = %user.id, "verification_reissued");
        Ok(())
    }

    /// Delivery is best-effort; the stored code stays valid either way.
    async fn deliver(&self, email: &str, code: &VerificationCode) {
        if let Err(e) = self.notifier.send_verification(email, code).await {
            warn!(%email, error = %e, "verification delivery failed");
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let cost = self.cfg.hash_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let claims = Claims { id: user_id };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::Token(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::notifier::recording::RecordingNotifier;
    use crate::auth::repository::mock::MockAuthRepository;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    const SECRET: &str = "test-secret";

    struct Fixture {
        repo: Arc<MockAuthRepository>,
        mail: Arc<RecordingNotifier>,
        svc: AuthService<MockAuthRepository>,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MockAuthRepository::default());
        let mail = Arc::new(RecordingNotifier::default());
        let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: SECRET.into(), hash_cost: 4 })
            .with_notifier(mail.clone());
        Fixture { repo, mail, svc }
    }

    fn alice() -> RegisterInput {
        RegisterInput {
            email: Some("a@x.com".into()),
            name: Some("alice123".into()),
            address: Some("1 Rd".into()),
            phone_number: Some("5551234".into()),
            password: Some("secret1".into()),
            ..Default::default()
        }
    }

    fn login_input(email: &str, password: &str) -> LoginInput {
        LoginInput { email: Some(email.into()), password: Some(password.into()), ..Default::default() }
    }

    fn verify_input(code: VerificationCode) -> VerifyInput {
        VerifyInput { base: Some(code.id.to_string()), secret: Some(code.secret.to_string()), ..Default::default() }
    }

    #[tokio::test]
    async fn register_hashes_with_configured_cost() {
        let f = fixture();
        let out = f.svc.register(alice()).await.unwrap();
        assert_eq!(out.user.valid, Some(false));

        let stored = f.repo.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$2b$04$"), "{}", stored.password_hash);
        assert_ne!(stored.password_hash, "secret1");
        assert_eq!(f.mail.last_for("a@x.com"), out.user.verification);
    }

    #[tokio::test]
    async fn register_rejects_invalid_input_before_persisting() {
        let f = fixture();
        let input = RegisterInput { name: Some("abc".into()), ..alice() };
        let err = f.svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref m) if m.starts_with("\"name\"")));
        assert_eq!(f.repo.user_count(), 0);
        assert_eq!(f.mail.count(), 0);
    }

    #[tokio::test]
    async fn register_twice_is_duplicate() {
        let f = fixture();
        f.svc.register(alice()).await.unwrap();
        let err = f.svc.register(alice()).await.unwrap_err();
        assert!(matches!(err, AuthError::Duplicate("email")));
        assert_eq!(f.repo.user_count(), 1);
    }

    #[tokio::test]
    async fn login_requires_verification() {
        let f = fixture();
        let out = f.svc.register(alice()).await.unwrap();

        let err = f.svc.login(login_input("a@x.com", "secret1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Unverified));

        let code = out.user.verification.unwrap();
        f.svc.verify(verify_input(code)).await.unwrap();

        let session = f.svc.login(login_input("a@x.com", "secret1")).await.unwrap();
        assert_eq!(session.user.id, out.user.id);
        assert!(session.user.valid.is_none());
        assert!(session.user.verification.is_none());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        let data = decode::<serde_json::Value>(&session.token, &DecodingKey::from_secret(SECRET.as_bytes()), &validation).unwrap();
        assert_eq!(data.claims, serde_json::json!({ "id": out.user.id }));
    }

    #[tokio::test]
    async fn login_rejects_malformed_input() {
        let f = fixture();
        f.svc.register(alice()).await.unwrap();

        let cases = [
            (LoginInput { password: Some("secret1".into()), ..Default::default() }, "\"email\" is required"),
            (login_input("not-an-email", "secret1"), "\"email\" must be a valid email"),
            (login_input("a@localhost", "secret1"), "\"email\" must be a valid email"),
            (LoginInput { email: Some("a@x.com".into()), ..Default::default() }, "\"password\" is required"),
            (login_input("a@x.com", "short"), "\"password\" length must be between 6 and 24 characters"),
            (login_input("a@x.com", &"p".repeat(25)), "\"password\" length must be between 6 and 24 characters"),
        ];
        for (input, expected) in cases {
            match f.svc.login(input).await {
                Err(AuthError::Validation(m)) => assert_eq!(m, expected),
                other => panic!("expected validation error {expected:?}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn register_rejects_unknown_keys() {
        let f = fixture();
        let mut input = alice();
        input.extra.insert("valid".into(), serde_json::json!(true));
        let err = f.svc.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "\"valid\" is not allowed"), "{err:?}");
        assert_eq!(f.repo.user_count(), 0);
    }

    #[tokio::test]
    async fn login_wrong_password_is_invalid_credentials() {
        let f = fixture();
        f.svc.register(alice()).await.unwrap();
        let err = f.svc.login(login_input("a@x.com", "wrong-pass")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "Your email and password are not valid!");
    }

    #[tokio::test]
    async fn login_unknown_email_is_not_found() {
        let f = fixture();
        let err = f.svc.login(login_input("ghost@x.com", "secret1")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound("email")));
    }

    #[tokio::test]
    async fn verify_needs_exact_pair() {
        let f = fixture();
        let out = f.svc.register(alice()).await.unwrap();
        let code = out.user.verification.unwrap();

        let wrong_secret = VerificationCode { secret: Uuid::new_v4(), ..code };
        assert!(matches!(f.svc.verify(verify_input(wrong_secret)).await, Err(AuthError::InvalidVerification)));

        let wrong_id = VerificationCode { id: Uuid::new_v4(), ..code };
        assert!(matches!(f.svc.verify(verify_input(wrong_id)).await, Err(AuthError::InvalidVerification)));

        let garbage = VerifyInput { base: Some("not-an-id".into()), secret: Some("x".into()), ..Default::default() };
        assert!(matches!(f.svc.verify(garbage).await, Err(AuthError::InvalidVerification)));

        let missing = VerifyInput { base: None, secret: Some(code.secret.to_string()), ..Default::default() };
        assert!(matches!(f.svc.verify(missing).await, Err(AuthError::Validation(_))));

        f.svc.verify(verify_input(code)).await.unwrap();
        assert!(f.repo.find_user_by_email("a@x.com").await.unwrap().unwrap().valid);
    }

    #[tokio::test]
    async fn resend_replaces_code() {
        let f = fixture();
        let out = f.svc.register(alice()).await.unwrap();
        let old = out.user.verification.unwrap();

        f.svc.resend(ResendInput { email: Some("a@x.com".into()), ..Default::default() }).await.unwrap();
        let fresh = f.mail.last_for("a@x.com").unwrap();
        assert_ne!(fresh, old);

        assert!(matches!(f.svc.verify(verify_input(old)).await, Err(AuthError::InvalidVerification)));
        f.svc.verify(verify_input(fresh)).await.unwrap();
    }

    #[tokio::test]
    async fn resend_unknown_email_is_not_found() {
        let f = fixture();
        let err = f.svc.resend(ResendInput { email: Some("ghost@x.com".into()), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound("email")));

        let err = f.svc.resend(ResendInput { email: Some("bad".into()), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
