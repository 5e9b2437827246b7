//! Reservation management service

use crate::{
    error::{AppError, AppResult},
    models::reservation::{CreateReservation, ReservationDetails, UpdateReservation},
    repository::Repository,
};

/// Field error for a write payload referencing a missing row
fn invalid_pk(field: &str, id: i32) -> AppError {
    AppError::field(
        field,
        &format!("Clave primaria \"{}\" inválida - objeto no existe.", id),
    )
}

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all reservations
    pub async fn list_reservations(&self) -> AppResult<Vec<ReservationDetails>> {
        self.repository.reservations.list().await
    }

    /// Get reservation by ID
    pub async fn get_reservation(&self, id: i32) -> AppResult<ReservationDetails> {
        self.repository.reservations.get_details(id).await
    }

    /// Create a new reservation
    pub async fn create_reservation(
        &self,
        reservation: &CreateReservation,
    ) -> AppResult<ReservationDetails> {
        if !self.repository.users.exists(reservation.cliente).await? {
            return Err(invalid_pk("cliente", reservation.cliente));
        }
        if !self.repository.books.exists(reservation.libro).await? {
            return Err(invalid_pk("libro", reservation.libro));
        }

        self.repository.reservations.create(reservation).await
    }

    /// Update an existing reservation
    pub async fn update_reservation(
        &self,
        id: i32,
        reservation: &UpdateReservation,
    ) -> AppResult<ReservationDetails> {
        // 404 before any field errors
        self.repository.reservations.get_details(id).await?;

        if let Some(cliente) = reservation.cliente {
            if !self.repository.users.exists(cliente).await? {
                return Err(invalid_pk("cliente", cliente));
            }
        }
        if let Some(libro) = reservation.libro {
            if !self.repository.books.exists(libro).await? {
                return Err(invalid_pk("libro", libro));
            }
        }

        self.repository.reservations.update(id, reservation).await
    }

    /// Delete a reservation
    pub async fn delete_reservation(&self, id: i32) -> AppResult<()> {
        self.repository.reservations.get_details(id).await?;
        self.repository.reservations.delete(id).await
    }
}
