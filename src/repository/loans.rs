//! Loans repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::enums::LoanStatus,
    models::loan::{CreateLoan, LoanDetails, UpdateLoan},
};

/// Loan rows joined with the borrower's username and the book title,
/// aliased to the names the wire format uses.
const SELECT_DETAILS: &str = r#"
    SELECT p.id, p.usuario_id AS cliente, u.username AS cliente_nombre,
           p.libro_id AS libro, l.titulo AS libro_titulo,
           p.fecha_prestamo, p.fecha_devolucion_esperada,
           p.fecha_devolucion_real, p.estado
    FROM prestamos p
    JOIN usuarios u ON u.id = p.usuario_id
    JOIN libros l ON l.id = p.libro_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all loans
    pub async fn list(&self) -> AppResult<Vec<LoanDetails>> {
        let query = format!("{} ORDER BY p.id", SELECT_DETAILS);

        let loans = sqlx::query_as::<_, LoanDetails>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(loans)
    }

    /// Get loan by ID
    pub async fn get_details(&self, id: i32) -> AppResult<LoanDetails> {
        let query = format!("{} WHERE p.id = $1", SELECT_DETAILS);

        let loan = sqlx::query_as::<_, LoanDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No encontrado.".to_string()))?;

        Ok(loan)
    }

    /// Create a new loan. fecha_prestamo is stamped by the database.
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<LoanDetails> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO prestamos
                (usuario_id, libro_id, fecha_devolucion_esperada, fecha_devolucion_real, estado)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(loan.cliente)
        .bind(loan.libro)
        .bind(loan.fecha_devolucion_esperada)
        .bind(loan.fecha_devolucion_real)
        .bind(loan.estado.unwrap_or(LoanStatus::Activo))
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }

    /// Update an existing loan
    pub async fn update(&self, id: i32, loan: &UpdateLoan) -> AppResult<LoanDetails> {
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

        add_field!(loan.cliente, "usuario_id");
        add_field!(loan.libro, "libro_id");
        add_field!(loan.fecha_devolucion_esperada, "fecha_devolucion_esperada");
        add_field!(loan.fecha_devolucion_real, "fecha_devolucion_real");
        add_field!(loan.estado, "estado");

        if sets.is_empty() {
            return self.get_details(id).await;
        }

        let query = format!("UPDATE prestamos SET {} WHERE id = {}", sets.join(", "), id);

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(loan.cliente);
        bind_field!(loan.libro);
        bind_field!(loan.fecha_devolucion_esperada);
        bind_field!(loan.fecha_devolucion_real);
        bind_field!(loan.estado);

        builder.execute(&self.pool).await?;

        self.get_details(id).await
    }

    /// Delete a loan
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM prestamos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Return a loan: set estado to Devuelto and stamp the real return
    /// date with the server's current date. Returning an already returned
    /// loan is refused without touching the record.
    pub async fn return_loan(&self, id: i32) -> AppResult<LoanDetails> {
        let loan = self.get_details(id).await?;

        if loan.estado == LoanStatus::Devuelto {
            return Err(AppError::BadRequest(
                "El préstamo ya está devuelto.".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE prestamos SET estado = $1, fecha_devolucion_real = CURRENT_DATE WHERE id = $2",
        )
        .bind(LoanStatus::Devuelto)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_details(id).await
    }
}
