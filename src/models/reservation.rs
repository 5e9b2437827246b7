//! Reservation model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::enums::ReservationStatus;

/// Reservation with the denormalized names the wire format carries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReservationDetails {
    pub id: i32,
    pub cliente: i32,
    pub cliente_nombre: String,
    pub libro: i32,
    pub libro_titulo: String,
    pub fecha_reserva: DateTime<Utc>,
    pub fecha_vencimiento: Option<NaiveDate>,
    pub estado: ReservationStatus,
}

/// Create reservation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservation {
    pub cliente: i32,
    pub libro: i32,
    pub fecha_vencimiento: Option<NaiveDate>,
    /// Defaults to Pendiente
    pub estado: Option<ReservationStatus>,
}

/// Update reservation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReservation {
    pub cliente: Option<i32>,
    pub libro: Option<i32>,
    pub fecha_vencimiento: Option<NaiveDate>,
    pub estado: Option<ReservationStatus>,
}
