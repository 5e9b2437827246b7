//! Authentication endpoints: login, registration and CSRF token

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateClient, LoginRequest, LoginResponse, RegisterResponse},
    AppState,
};

use super::SESSION_COOKIE;

/// Name of the CSRF cookie
pub const CSRF_COOKIE: &str = "csrftoken";

/// The cookie carries no max-age: the token's own expiry bounds the
/// session, and browsers drop the cookie when the window closes.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/login/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookie set", body = LoginResponse),
        (status = 401, description = "Wrong username or password", body = crate::error::ErrorMessage),
        (status = 403, description = "Inactive account", body = crate::error::ErrorMessage)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let (token, user, roles) = state
        .services
        .auth
        .authenticate(&payload.username, &payload.password)
        .await?;

    Ok((
        jar.add(session_cookie(token)),
        Json(LoginResponse {
            message: "Inicio de sesión exitoso.".to_string(),
            username: user.username,
            roles,
        }),
    ))
}

/// Register a new client account
#[utoipa::path(
    post,
    path = "/registro/",
    tag = "auth",
    request_body = CreateClient,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation errors keyed by field", body = crate::error::FieldErrors)
    )
)]
pub async fn registro(
    State(state): State<AppState>,
    Json(payload): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    payload.validate()?;

    let user = state.services.auth.register(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registro exitoso.".to_string(),
            username: user.username,
        }),
    ))
}

/// Issue a CSRF cookie for browser clients
#[utoipa::path(
    get,
    path = "/csrf-token/",
    tag = "auth",
    responses(
        (status = 200, description = "CSRF cookie set")
    )
)]
pub async fn csrf_token(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    // Readable from JavaScript on purpose: clients echo it in a header
    let cookie = Cookie::build((CSRF_COOKIE, token))
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    (jar.add(cookie), Json(json!({ "message": "CSRF cookie set" })))
}
