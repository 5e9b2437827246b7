//! Role management service

use crate::{
    error::{AppError, AppResult},
    models::role::{CreateRole, Role, UpdateRole},
    repository::Repository,
};

/// Wire message for a uniqueness violation on a field
const MSG_NOT_UNIQUE: &str = "Este campo debe ser único.";

#[derive(Clone)]
pub struct RolesService {
    repository: Repository,
}

impl RolesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all roles
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.repository.roles.list().await
    }

    /// Get role by ID
    pub async fn get_role(&self, id: i32) -> AppResult<Role> {
        self.repository.roles.get_by_id(id).await
    }

    /// Create a new role
    pub async fn create_role(&self, role: &CreateRole) -> AppResult<Role> {
        if self.repository.roles.nombre_exists(&role.nombre, None).await? {
            return Err(AppError::field("nombre", MSG_NOT_UNIQUE));
        }

        self.repository.roles.create(&role.nombre).await
    }

    /// Rename a role
    pub async fn update_role(&self, id: i32, role: &UpdateRole) -> AppResult<Role> {
        // 404 before any field errors
        let existing = self.repository.roles.get_by_id(id).await?;

        let Some(ref nombre) = role.nombre else {
            return Ok(existing);
        };

        if self.repository.roles.nombre_exists(nombre, Some(id)).await? {
            return Err(AppError::field("nombre", MSG_NOT_UNIQUE));
        }

        self.repository.roles.update(id, nombre).await
    }

    /// Delete a role. Its assignments disappear with it.
    pub async fn delete_role(&self, id: i32) -> AppResult<()> {
        self.repository.roles.get_by_id(id).await?;
        self.repository.roles.delete(id).await
    }
}
