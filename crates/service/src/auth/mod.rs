//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, email verification and code resend live here,
//! independent of the HTTP framework.

pub mod domain;
pub mod errors;
pub mod notifier;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
