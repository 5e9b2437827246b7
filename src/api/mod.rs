//! API handlers for the Biblioteca REST endpoints

pub mod auth;
pub mod books;
pub mod clients;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod reservations;
pub mod roles;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{error::AppError, models::user::CurrentUser, AppState};

/// Name of the session cookie set at login
pub const SESSION_COOKIE: &str = "sessionid";

/// Extractor for the authenticated account. The session token is read
/// from the sessionid cookie, with an Authorization bearer header as
/// fallback; the account and its roles are then loaded from the
/// database, so role changes apply to live sessions.
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.to_string())
                .ok_or_else(|| {
                    AppError::Authentication(
                        "Las credenciales de autenticación no se proveyeron.".to_string(),
                    )
                })?,
        };

        let current = state.services.auth.current_user(&token).await?;

        Ok(AuthenticatedUser(current))
    }
}
