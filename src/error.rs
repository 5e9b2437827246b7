//! Error types for the Biblioteca server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::ValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Login rejected: unknown username or password mismatch.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login rejected: the account exists but is deactivated.
    #[error("Inactive account")]
    InactiveAccount,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation error naming a single field, e.g. a uniqueness violation.
    pub fn field(field: &str, message: &str) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }
}

/// Validation errors keyed by field name, serialized as
/// `{"campo": ["mensaje", ...]}`.
#[derive(Debug, Default, Serialize, utoipa::ToSchema)]
pub struct FieldErrors(#[schema(value_type = Object)] pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), vec![message.to_string()]);
        Self(fields)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Valor inválido para {}.", field),
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        Self::Validation(FieldErrors(fields))
    }
}

/// Error body carrying a single `detail` message.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Error body used by the login endpoint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorMessage {
    pub error: String,
}

fn detail_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorDetail { detail })).into_response()
}

fn message_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(ErrorMessage {
            error: error.to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidCredentials => message_response(
                StatusCode::UNAUTHORIZED,
                "Credenciales inválidas. Usuario o contraseña incorrectos.",
            ),
            AppError::InactiveAccount => message_response(
                StatusCode::FORBIDDEN,
                "Cuenta inactiva. Contacte al administrador.",
            ),
            AppError::Authentication(msg) => detail_response(StatusCode::UNAUTHORIZED, msg),
            AppError::Authorization(msg) => detail_response(StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => detail_response(StatusCode::NOT_FOUND, msg),
            AppError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                detail_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor.".to_string(),
                )
            }
            AppError::Conflict(msg) => detail_response(StatusCode::CONFLICT, msg),
            AppError::BadRequest(msg) => detail_response(StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                detail_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor.".to_string(),
                )
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_field_error_serializes_as_field_map() {
        let err = AppError::field("username", "Ya existe un usuario con ese nombre de usuario.");
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": ["Ya existe un usuario con ese nombre de usuario."]
            })
        );
    }

    #[test]
    fn validator_errors_keep_custom_messages() {
        use validator::Validate;

        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 1, message = "Este campo no puede estar en blanco."))]
            username: String,
        }

        let payload = Payload {
            username: String::new(),
        };
        let err: AppError = payload.validate().unwrap_err().into();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            fields.0["username"],
            vec!["Este campo no puede estar en blanco.".to_string()]
        );
    }
}
