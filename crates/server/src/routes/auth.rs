use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Query, State},
    Json,
};
use common::Reply;
use service::auth::domain::{AuthSession, LoginInput, RegisterInput, Registered, ResendInput, VerifyInput};
use service::auth::repository::AuthRepository;
use service::auth::AuthService;

use crate::errors::ApiError;

/// Shared handler state: the auth service over a type-erased repository.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
}

impl AppState {
    pub fn new(auth: AuthService<dyn AuthRepository>) -> Self {
        Self { auth: Arc::new(auth) }
    }
}

#[utoipa::path(
    post, path = "/api/v1/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Token issued"),
        (status = 400, description = "Invalid input, unknown email, wrong password or unverified account", body = crate::openapi::MessageBody),
        (status = 500, description = "Internal error", body = crate::openapi::MessageBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<Reply<AuthSession>>, ApiError> {
    let Json(input) = payload?;
    let session = state.auth.login(input).await?;
    Ok(Json(Reply::success("Login is success!", session)))
}

#[utoipa::path(
    post, path = "/api/v1/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 200, description = "Registered, verification issued"),
        (status = 400, description = "Invalid input or duplicate email", body = crate::openapi::MessageBody),
        (status = 500, description = "Internal error", body = crate::openapi::MessageBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<Json<Reply<Registered>>, ApiError> {
    let Json(input) = payload?;
    let registered = state.auth.register(input).await?;
    Ok(Json(Reply::success("Registration is success!", registered)))
}

#[utoipa::path(
    post, path = "/api/v1/validate", tag = "auth",
    params(
        ("base" = String, Query, description = "Verification id"),
        ("secret" = String, Query, description = "Verification secret")
    ),
    responses(
        (status = 200, description = "Account verified", body = crate::openapi::MessageBody),
        (status = 400, description = "Missing values or no matching verification", body = crate::openapi::MessageBody)
    )
)]
pub async fn validate(
    State(state): State<AppState>,
    query: Result<Query<VerifyInput>, QueryRejection>,
) -> Result<Json<Reply<()>>, ApiError> {
    let Query(input) = query?;
    state.auth.verify(input).await?;
    Ok(Json(Reply::ack("Your verification is success!")))
}

#[utoipa::path(
    post, path = "/api/v1/resend", tag = "auth",
    request_body = crate::openapi::ResendRequest,
    responses(
        (status = 200, description = "New verification issued", body = crate::openapi::MessageBody),
        (status = 400, description = "Invalid input or unknown email", body = crate::openapi::MessageBody)
    )
)]
pub async fn resend(
    State(state): State<AppState>,
    payload: Result<Json<ResendInput>, JsonRejection>,
) -> Result<Json<Reply<()>>, ApiError> {
    let Json(input) = payload?;
    state.auth.resend(input).await?;
    Ok(Json(Reply::ack("Resend verification is success!")))
}
