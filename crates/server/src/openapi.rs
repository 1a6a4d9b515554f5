use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// `{status, message}` body of acknowledgements and failures.
#[derive(ToSchema)]
pub struct MessageBody {
    pub status: String,
    pub message: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct ResendRequest {
    pub email: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::validate,
        crate::routes::auth::resend,
    ),
    components(
        schemas(
            HealthResponse,
            MessageBody,
            RegisterRequest,
            LoginRequest,
            ResendRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
