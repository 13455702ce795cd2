//! Registration, login, and logout handlers
use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::{CurrentUser, SESSION_COOKIE};
use crate::security::JwtKeys;
use crate::services::UserService;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub username: String,
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginNext {
    pub next: Option<String>,
}

fn session_cookie(token: &str) -> Cookie<'_> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish()
}

/// Register a new user and hand back a session token.
#[utoipa::path(
    post,
    path = "/auth/signup/",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid username, email, or password"),
        (status = 409, description = "Username or email already registered")
    )
)]
pub async fn signup(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| crate::error::AppError::Validation(e.to_string()))?;

    let user = UserService::new(pool.get_ref().clone())
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    let token = keys.issue(user.id, &user.username)?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&token))
        .json(AuthResponse {
            user_id: user.id,
            username: user.username,
            access_token: token,
            token_type: "bearer".to_string(),
        }))
}

/// The login page unauthenticated requests are redirected to. Echoes
/// the `next` return path so a client can come back after logging in.
pub async fn login_form(query: web::Query<LoginNext>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "detail": "authentication required",
        "next": query.next,
    })))
}

/// Check credentials and set the session cookie.
#[utoipa::path(
    post,
    path = "/auth/login/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    pool: web::Data<PgPool>,
    keys: web::Data<JwtKeys>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    payload
        .validate()
        .map_err(|e| crate::error::AppError::Validation(e.to_string()))?;

    let user = UserService::new(pool.get_ref().clone())
        .authenticate(&payload.username, &payload.password)
        .await?;

    let token = keys.issue(user.id, &user.username)?;
    tracing::info!(user_id = %user.id, "login succeeded");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(AuthResponse {
            user_id: user.id,
            username: user.username,
            access_token: token,
            token_type: "bearer".to_string(),
        }))
}

/// Clear the session cookie. Tokens are stateless, so logout is purely
/// client-side.
pub async fn logout(user: CurrentUser) -> Result<HttpResponse> {
    tracing::debug!(user_id = %user.id, "logout");

    let mut removal = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    removal.set_max_age(CookieDuration::ZERO);

    Ok(HttpResponse::Ok()
        .cookie(removal)
        .json(serde_json::json!({"detail": "logged out"})))
}
