use models::errors::ModelError;
use thiserror::Error;

/// Business errors for auth workflows.
///
/// The `Display` text of client-facing variants is the message returned to
/// callers verbatim.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Your {0} already exist.")]
    Duplicate(&'static str),
    #[error("Your {0} not exist.")]
    NotFound(&'static str),
    #[error("Your email and password are not valid!")]
    InvalidCredentials,
    #[error("Check your email for verification!")]
    Unverified,
    #[error("Your verification is not valid!")]
    InvalidVerification,
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("delivery error: {0}")]
    Delivery(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Duplicate(_) => 1002,
            AuthError::NotFound(_) => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::Unverified => 1005,
            AuthError::InvalidVerification => 1006,
            AuthError::Hash(_) => 1101,
            AuthError::Token(_) => 1102,
            AuthError::Delivery(_) => 1103,
            AuthError::Repository(_) => 1200,
        }
    }

    /// Faults the caller cannot fix; their detail is never sent to clients.
    pub fn is_internal(&self) -> bool {
        self.code() >= 1100
    }
}

impl From<ModelError> for AuthError {
    fn from(e: ModelError) -> Self {
        match e {
            // the only unique column a caller controls is the email
            ModelError::Conflict(_) => AuthError::Duplicate("email"),
            ModelError::Validation(msg) | ModelError::Db(msg) => AuthError::Repository(msg),
        }
    }
}
