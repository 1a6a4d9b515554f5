//! Service layer: registration and verification workflows on top of `models`.
//! - Separates business logic from data access (`AuthRepository`).
//! - Provides clear error types and documented interfaces.

pub mod auth;
#[cfg(test)]
pub mod test_support;
