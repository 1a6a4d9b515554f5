//! Delivery of verification codes to the account's email address.

use async_trait::async_trait;
use tracing::info;

use super::domain::VerificationCode;
use super::errors::AuthError;

#[async_trait]
pub trait VerificationNotifier: Send + Sync {
    async fn send_verification(&self, email: &str, code: &VerificationCode) -> Result<(), AuthError>;
}

/// Records the issued base id in the log instead of sending mail. The
/// secret is never written.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl VerificationNotifier for LogNotifier {
    async fn send_verification(&self, email: &str, code: &VerificationCode) -> Result<(), AuthError> {
        info!(%email, base = %code.id, "verification_issued");
        Ok(())
    }
}

/// Keeps every delivered code in memory; used by tests to read back what a
/// user would have received.
pub mod recording {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<(String, VerificationCode)>>,
    }

    impl RecordingNotifier {
        /// Most recent code delivered to `email`.
        pub fn last_for(&self, email: &str) -> Option<VerificationCode> {
            let sent = self.sent.lock().ok()?;
            sent.iter().rev().find(|(to, _)| to == email).map(|(_, code)| *code)
        }

        pub fn count(&self) -> usize {
            self.sent.lock().map(|s| s.len()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl VerificationNotifier for RecordingNotifier {
        async fn send_verification(&self, email: &str, code: &VerificationCode) -> Result<(), AuthError> {
            self.sent
                .lock()
                .map_err(|_| AuthError::Delivery("recorder lock poisoned".into()))?
                .push((email.to_string(), *code));
            Ok(())
        }
    }
}
