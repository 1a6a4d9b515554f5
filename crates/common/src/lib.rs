//! Shared building blocks for the HTTP layer: uniform response bodies and
//! logging initialization.

pub mod types;
pub mod utils;

pub use types::{Health, Message, Reply};
