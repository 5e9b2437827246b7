//! Roles repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::role::Role,
};

#[derive(Clone)]
pub struct RolesRepository {
    pool: Pool<Postgres>,
}

impl RolesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all roles
    pub async fn list(&self) -> AppResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, nombre FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(roles)
    }

    /// Get role by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Role> {
        let role = sqlx::query_as::<_, Role>("SELECT id, nombre FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No encontrado.".to_string()))?;

        Ok(role)
    }

    /// Get a role by name, creating it when missing. The upsert keeps the
    /// lookup-and-insert atomic under concurrent registrations.
    pub async fn get_or_create(&self, nombre: &str) -> AppResult<Role> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (nombre) VALUES ($1)
            ON CONFLICT (nombre) DO UPDATE SET nombre = EXCLUDED.nombre
            RETURNING id, nombre
            "#,
        )
        .bind(nombre)
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }

    /// Check if a role name is already taken (exact match)
    pub async fn nombre_exists(&self, nombre: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE nombre = $1 AND id != $2)")
                .bind(nombre)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE nombre = $1)")
                .bind(nombre)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new role
    pub async fn create(&self, nombre: &str) -> AppResult<Role> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (nombre) VALUES ($1) RETURNING id, nombre",
        )
        .bind(nombre)
        .fetch_one(&self.pool)
        .await?;

        Ok(role)
    }

    /// Rename a role
    pub async fn update(&self, id: i32, nombre: &str) -> AppResult<Role> {
        sqlx::query("UPDATE roles SET nombre = $1 WHERE id = $2")
            .bind(nombre)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.get_by_id(id).await
    }

    /// Delete a role; its usuario_roles rows cascade
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
