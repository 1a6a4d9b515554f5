use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::Message;
use service::auth::errors::AuthError;
use thiserror::Error;
use tracing::{debug, error};

/// Handler error: domain failures become 400 `invalid` bodies, internal
/// faults a generic 500 `error` body.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AuthError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(AuthError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if err.is_internal() {
            error!(code = err.code(), error = %err, "request failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(Message::error())).into_response();
        }
        debug!(code = err.code(), message = %err, "request rejected");
        let body = match &err {
            AuthError::Duplicate(key) => Message::duplicate(key),
            AuthError::NotFound(key) => Message::notexist(key),
            other => Message::invalid(other.to_string()),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(String),
}
