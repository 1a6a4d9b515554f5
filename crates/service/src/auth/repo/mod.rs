//! Storage-backed implementations of [`super::repository::AuthRepository`].

pub mod seaorm;
