//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::enums::AccountStatus,
    models::user::{ClientDetails, CreateClient, UpdateClient, User},
};

/// Filter matching the accounts exposed by the clients surface:
/// no superusers, nobody holding the Administrador role.
const CLIENT_FILTER: &str = r#"
    u.is_superuser = FALSE
    AND NOT EXISTS (
        SELECT 1
        FROM usuario_roles ur2
        JOIN roles r2 ON r2.id = ur2.rol_id
        WHERE ur2.usuario_id = u.id AND r2.nombre = 'Administrador'
    )
"#;

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No encontrado.".to_string()))?;

        Ok(user)
    }

    /// Get user by username. The lookup is exact and case-sensitive.
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM usuarios WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Check that a user id exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM usuarios WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Check if a username is already taken (exact match)
    pub async fn username_exists(&self, username: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM usuarios WHERE username = $1 AND id != $2)")
                .bind(username)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM usuarios WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Role names attached to a user, for the guard and the login response
    pub async fn get_role_names(&self, user_id: i32) -> AppResult<Vec<String>> {
        let roles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.nombre
            FROM roles r
            JOIN usuario_roles ur ON ur.rol_id = r.id
            WHERE ur.usuario_id = $1
            ORDER BY r.nombre
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    /// List client accounts with their role names
    pub async fn list_clients(&self) -> AppResult<Vec<ClientDetails>> {
        let query = format!(
            r#"
            SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.estado,
                   COALESCE(
                       ARRAY_AGG(r.nombre ORDER BY r.nombre) FILTER (WHERE r.nombre IS NOT NULL),
                       '{{}}'
                   ) AS roles
            FROM usuarios u
            LEFT JOIN usuario_roles ur ON ur.usuario_id = u.id
            LEFT JOIN roles r ON r.id = ur.rol_id
            WHERE {}
            GROUP BY u.id
            ORDER BY u.id
            "#,
            CLIENT_FILTER
        );

        let clients = sqlx::query_as::<_, ClientDetails>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    /// Get a single client. Superusers and Administrador role holders are
    /// outside this surface, so their ids come back as not found.
    pub async fn get_client(&self, id: i32) -> AppResult<ClientDetails> {
        let query = format!(
            r#"
            SELECT u.id, u.username, u.email, u.first_name, u.last_name, u.estado,
                   COALESCE(
                       ARRAY_AGG(r.nombre ORDER BY r.nombre) FILTER (WHERE r.nombre IS NOT NULL),
                       '{{}}'
                   ) AS roles
            FROM usuarios u
            LEFT JOIN usuario_roles ur ON ur.usuario_id = u.id
            LEFT JOIN roles r ON r.id = ur.rol_id
            WHERE u.id = $1 AND {}
            GROUP BY u.id
            "#,
            CLIENT_FILTER
        );

        let client = sqlx::query_as::<_, ClientDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No encontrado.".to_string()))?;

        Ok(client)
    }

    /// Create a new account
    pub async fn create(&self, client: &CreateClient, password_hash: &str) -> AppResult<User> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO usuarios (username, email, first_name, last_name, password, estado)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&client.username)
        .bind(client.email.as_deref().unwrap_or(""))
        .bind(client.first_name.as_deref().unwrap_or(""))
        .bind(client.last_name.as_deref().unwrap_or(""))
        .bind(password_hash)
        .bind(client.estado.unwrap_or(AccountStatus::Activo))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing account
    pub async fn update(
        &self,
        id: i32,
        client: &UpdateClient,
        password_hash: Option<String>,
    ) -> AppResult<User> {
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

        add_field!(client.username, "username");
        add_field!(client.email, "email");
        add_field!(client.first_name, "first_name");
        add_field!(client.last_name, "last_name");
        add_field!(client.estado, "estado");
        add_field!(client.is_active, "is_active");

        if password_hash.is_some() {
            sets.push(format!("password = ${}", param_idx));
        }

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!("UPDATE usuarios SET {} WHERE id = {}", sets.join(", "), id);

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(client.username);
        bind_field!(client.email);
        bind_field!(client.first_name);
        bind_field!(client.last_name);
        bind_field!(client.estado);
        bind_field!(client.is_active);

        if let Some(ref hash) = password_hash {
            builder = builder.bind(hash);
        }

        builder.execute(&self.pool).await?;

        self.get_by_id(id).await
    }

    /// Delete an account. Accounts referenced by prestamos are protected.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let loans: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM prestamos WHERE usuario_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if loans > 0 {
            return Err(AppError::Conflict(
                "No se puede eliminar: el usuario tiene préstamos asociados.".to_string(),
            ));
        }

        sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Attach a role to a user (idempotent)
    pub async fn attach_role(&self, usuario_id: i32, rol_id: i32) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO usuario_roles (usuario_id, rol_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(usuario_id)
        .bind(rol_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stamp last_login on successful authentication
    pub async fn set_last_login(&self, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE usuarios SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Whether any superuser account exists
    pub async fn superuser_exists(&self) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM usuarios WHERE is_superuser = TRUE)")
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a superuser account (startup bootstrap)
    pub async fn create_superuser(&self, username: &str, password_hash: &str) -> AppResult<User> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO usuarios (username, password, is_superuser)
            VALUES ($1, $2, TRUE)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }
}
