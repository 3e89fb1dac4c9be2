//! Account API handlers.
//!
//! ```text
//! POST /api/v1/users/register {"username":"ada","email":"ada@example.org","password":"pw","role":"volunteer"}
//! POST /api/v1/users/login {"email":"ada@example.org","password":"pw"}
//! POST /api/v1/users/logout
//! GET  /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{ErrorCode, LoginCredentials, Registration, SafeUser};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-up body. Absent fields are reported as `ArgumentRequired`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `volunteer` or `association`.
    pub role: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(value: RegisterRequest) -> Self {
        Registration::new(
            value.username.unwrap_or_default(),
            value.email.unwrap_or_default(),
            value.password.unwrap_or_default(),
            value.role.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SafeUser),
        (status = 400, description = "Missing field", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Unknown role or malformed email", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::from(payload.into_inner());
    let user = state.accounts.sign_up(&registration).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Check credentials and open a session.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SafeUser,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing field", body = ErrorBody),
        (status = 422, description = "Invalid email or password", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SafeUser>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )?;
    let user = state.accounts.authenticate(&credentials).await?;
    session.persist(&user)?;
    info!(user_id = %user.id, "signed in");
    Ok(web::Json(user))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/users/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Return the signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current account", body = SafeUser),
        (status = 401, description = "No session or account removed", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SafeUser>> {
    let actor = session.require_actor()?;
    match state.accounts.current_user(actor.id).await {
        Ok(user) => Ok(web::Json(user)),
        Err(err) => {
            if err.code() == ErrorCode::Unauthorized {
                session.purge();
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests;
