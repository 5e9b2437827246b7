//! Data models for the Biblioteca server

pub mod book;
pub mod enums;
pub mod loan;
pub mod reservation;
pub mod role;
pub mod user;

use validator::{ValidateLength, ValidationError};

/// Non-blank field capped at `max` characters. Stands in for the pair
/// `length(min = 1)` / `length(max)` with distinct messages, which the
/// validator derive cannot express on a single field.
pub(crate) fn non_blank_max(value: &str, max: u64) -> Result<(), ValidationError> {
    let mut error = ValidationError::new("length");
    if !value.validate_length(Some(1), None, None) {
        error.message = Some("Este campo no puede estar en blanco.".into());
        return Err(error);
    }
    if !value.validate_length(None, Some(max), None) {
        error.message = Some(
            format!("Asegúrese de que este campo no tenga más de {max} caracteres.").into(),
        );
        return Err(error);
    }
    Ok(())
}

pub(crate) fn non_blank_max_20(value: &str) -> Result<(), ValidationError> {
    non_blank_max(value, 20)
}

pub(crate) fn non_blank_max_50(value: &str) -> Result<(), ValidationError> {
    non_blank_max(value, 50)
}

pub(crate) fn non_blank_max_100(value: &str) -> Result<(), ValidationError> {
    non_blank_max(value, 100)
}

pub(crate) fn non_blank_max_150(value: &str) -> Result<(), ValidationError> {
    non_blank_max(value, 150)
}

pub(crate) fn non_blank_max_255(value: &str) -> Result<(), ValidationError> {
    non_blank_max(value, 255)
}

// Re-export commonly used types
pub use book::{BookDetails, BookQuery};
pub use enums::{AccountStatus, Availability, LoanStatus, ReservationStatus};
pub use loan::LoanDetails;
pub use reservation::ReservationDetails;
pub use role::Role;
pub use user::{CurrentUser, User, UserClaims};
