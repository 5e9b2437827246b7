//! Reservations repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::enums::ReservationStatus,
    models::reservation::{CreateReservation, ReservationDetails, UpdateReservation},
};

/// Reservation rows joined with the borrower's username and the book
/// title, aliased to the names the wire format uses.
const SELECT_DETAILS: &str = r#"
    SELECT r.id, r.usuario_id AS cliente, u.username AS cliente_nombre,
           r.libro_id AS libro, l.titulo AS libro_titulo,
           r.fecha_reserva, r.fecha_vencimiento, r.estado
    FROM reservas r
    JOIN usuarios u ON u.id = r.usuario_id
    JOIN libros l ON l.id = r.libro_id
"#;

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all reservations
    pub async fn list(&self) -> AppResult<Vec<ReservationDetails>> {
        let query = format!("{} ORDER BY r.id", SELECT_DETAILS);

        let reservations = sqlx::query_as::<_, ReservationDetails>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(reservations)
    }

    /// Get reservation by ID
    pub async fn get_details(&self, id: i32) -> AppResult<ReservationDetails> {
        let query = format!("{} WHERE r.id = $1", SELECT_DETAILS);

        let reservation = sqlx::query_as::<_, ReservationDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No encontrado.".to_string()))?;

        Ok(reservation)
    }

    /// Create a new reservation. fecha_reserva is stamped by the database.
    pub async fn create(&self, reservation: &CreateReservation) -> AppResult<ReservationDetails> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO reservas (usuario_id, libro_id, fecha_vencimiento, estado)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(reservation.cliente)
        .bind(reservation.libro)
        .bind(reservation.fecha_vencimiento)
        .bind(reservation.estado.unwrap_or(ReservationStatus::Pendiente))
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }

    /// Update an existing reservation
    pub async fn update(
        &self,
        id: i32,
        reservation: &UpdateReservation,
    ) -> AppResult<ReservationDetails> {
        // Build dynamic update query
        let mut sets: Vec<String> = Vec::new();
        let mut param_idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(reservation.cliente, "usuario_id");
        add_field!(reservation.libro, "libro_id");
        add_field!(reservation.fecha_vencimiento, "fecha_vencimiento");
        add_field!(reservation.estado, "estado");

        if sets.is_empty() {
            return self.get_details(id).await;
        }

        let query = format!("UPDATE reservas SET {} WHERE id = {}", sets.join(", "), id);

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(reservation.cliente);
        bind_field!(reservation.libro);
        bind_field!(reservation.fecha_vencimiento);
        bind_field!(reservation.estado);

        builder.execute(&self.pool).await?;

        self.get_details(id).await
    }

    /// Delete a reservation
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM reservas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
