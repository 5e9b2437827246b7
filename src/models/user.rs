//! User accounts, credential payloads and session claims

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::models::enums::AccountStatus;

/// Characters a username may contain: letters, digits and `@ . + - _`.
pub static RE_USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.@+-]+$").unwrap()
});

/// Wire message for a username uniqueness violation
pub const MSG_USERNAME_TAKEN: &str = "Ya existe un usuario con ese nombre de usuario.";

const MSG_EMAIL_INVALID: &str = "Introduzca una dirección de correo electrónico válida.";

/// Full account row from the usuarios table
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub estado: AccountStatus,
    pub is_superuser: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Client representation returned by reads of the clients surface
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct ClientDetails {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub estado: AccountStatus,
    /// Role names attached through the usuario_roles relation
    pub roles: Vec<String>,
}

/// Client representation echoed by writes (no roles, never the password)
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct ClientSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub estado: AccountStatus,
}

impl From<User> for ClientSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            estado: user.estado,
        }
    }
}

/// Create client request (also the registration payload)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[validate(
        custom(function = crate::models::non_blank_max_150),
        regex(path = *RE_USERNAME, message = "Introduzca un nombre de usuario válido. Este valor puede contener únicamente letras, números y los caracteres @/./+/-/_.")
    )]
    pub username: String,
    /// Email address; may be blank
    #[validate(custom(function = email_or_blank))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "Asegúrese de que este campo no tenga más de 150 caracteres."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Asegúrese de que este campo no tenga más de 150 caracteres."))]
    pub last_name: Option<String>,
    /// Plain-text password, hashed before storage
    #[validate(length(min = 1, message = "Este campo no puede estar en blanco."))]
    pub password: String,
    pub estado: Option<AccountStatus>,
}

/// Update client request; every field optional, password re-hashed when given
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClient {
    #[validate(
        custom(function = crate::models::non_blank_max_150),
        regex(path = *RE_USERNAME, message = "Introduzca un nombre de usuario válido. Este valor puede contener únicamente letras, números y los caracteres @/./+/-/_.")
    )]
    pub username: Option<String>,
    #[validate(custom(function = email_or_blank))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "Asegúrese de que este campo no tenga más de 150 caracteres."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Asegúrese de que este campo no tenga más de 150 caracteres."))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, message = "Este campo no puede estar en blanco."))]
    pub password: Option<String>,
    pub estado: Option<AccountStatus>,
    /// Deactivated accounts are refused at login
    pub is_active: Option<bool>,
}

/// Accepts a well-formed address or the empty string
fn email_or_blank(email: &str) -> Result<(), ValidationError> {
    use validator::ValidateEmail;

    if email.is_empty() || email.validate_email() {
        Ok(())
    } else {
        let mut error = ValidationError::new("email");
        error.message = Some(MSG_EMAIL_INVALID.into());
        Err(error)
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
    pub roles: Vec<String>,
}

/// Successful registration response
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
}

/// JWT claims carried by the session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Username at token creation time
    pub sub: String,
    pub user_id: i32,
    pub iat: i64,
    pub exp: i64,
}

impl UserClaims {
    pub fn new(user: &User, session_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            iat: now,
            exp: now + (session_hours as i64) * 3600,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Authenticated account with its role names, loaded fresh per request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<String>,
}

impl CurrentUser {
    /// Superusers count as administrators; otherwise the account must hold
    /// a role named Administrador (case-insensitive).
    pub fn is_administrador(&self) -> bool {
        self.user.is_superuser
            || self
                .roles
                .iter()
                .any(|nombre| nombre.eq_ignore_ascii_case("Administrador"))
    }

    pub fn require_administrador(&self) -> Result<(), AppError> {
        if self.is_administrador() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Se requieren permisos de administrador.".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::AccountStatus;

    fn account(is_superuser: bool) -> User {
        User {
            id: 7,
            username: "lector".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password: "hash".to_string(),
            estado: AccountStatus::Activo,
            is_superuser,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn claims_round_trip_through_a_token() {
        let user = account(false);
        let claims = UserClaims::new(&user, 24);
        let token = claims.create_token("secreto-de-prueba").unwrap();
        let decoded = UserClaims::from_token(&token, "secreto-de-prueba").unwrap();
        assert_eq!(decoded.sub, "lector");
        assert_eq!(decoded.user_id, 7);
        assert_eq!(decoded.exp, claims.iat + 24 * 3600);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let claims = UserClaims::new(&account(false), 1);
        let token = claims.create_token("secreto-a").unwrap();
        assert!(UserClaims::from_token(&token, "secreto-b").is_err());
    }

    #[test]
    fn superuser_passes_the_admin_check_without_roles() {
        let current = CurrentUser {
            user: account(true),
            roles: vec![],
        };
        assert!(current.require_administrador().is_ok());
    }

    #[test]
    fn administrador_role_matches_case_insensitively() {
        let current = CurrentUser {
            user: account(false),
            roles: vec!["administrador".to_string()],
        };
        assert!(current.is_administrador());

        let current = CurrentUser {
            user: account(false),
            roles: vec!["ADMINISTRADOR".to_string()],
        };
        assert!(current.require_administrador().is_ok());
    }

    #[test]
    fn plain_client_fails_the_admin_check() {
        let current = CurrentUser {
            user: account(false),
            roles: vec!["Cliente".to_string()],
        };
        let err = current.require_administrador().unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[test]
    fn username_charset_is_enforced() {
        let payload = CreateClient {
            username: "usuario con espacios".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            password: "clave".to_string(),
            estado: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));

        let payload = CreateClient {
            username: "usuario.valido+1@dominio".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            password: "clave".to_string(),
            estado: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn blank_password_is_rejected() {
        let payload = CreateClient {
            username: "lector".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            password: String::new(),
            estado: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn blank_email_is_allowed_but_malformed_email_is_not() {
        let payload = UpdateClient {
            username: None,
            email: Some(String::new()),
            first_name: None,
            last_name: None,
            password: None,
            estado: None,
            is_active: None,
        };
        assert!(payload.validate().is_ok());

        let payload = UpdateClient {
            username: None,
            email: Some("no-es-un-correo".to_string()),
            first_name: None,
            last_name: None,
            password: None,
            estado: None,
            is_active: None,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
