//! Loan model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::enums::LoanStatus;

/// Loan with the denormalized names the wire format carries.
/// `cliente` is the borrower's usuario id; `cliente_nombre` and
/// `libro_titulo` are read-only lookups.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub cliente: i32,
    pub cliente_nombre: String,
    pub libro: i32,
    pub libro_titulo: String,
    pub fecha_prestamo: DateTime<Utc>,
    pub fecha_devolucion_esperada: NaiveDate,
    pub fecha_devolucion_real: Option<NaiveDate>,
    pub estado: LoanStatus,
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub cliente: i32,
    pub libro: i32,
    pub fecha_devolucion_esperada: NaiveDate,
    pub fecha_devolucion_real: Option<NaiveDate>,
    /// Defaults to Activo
    pub estado: Option<LoanStatus>,
}

/// Update loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLoan {
    pub cliente: Option<i32>,
    pub libro: Option<i32>,
    pub fecha_devolucion_esperada: Option<NaiveDate>,
    pub fecha_devolucion_real: Option<NaiveDate>,
    pub estado: Option<LoanStatus>,
}
