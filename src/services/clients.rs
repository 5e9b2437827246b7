//! Client account management service

use crate::{
    error::{AppError, AppResult},
    models::user::{ClientDetails, ClientSummary, CreateClient, UpdateClient, MSG_USERNAME_TAKEN},
    repository::Repository,
    services::auth::{hash_password, ROL_CLIENTE},
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
}

impl ClientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List client accounts. Superusers and Administrador role holders
    /// never appear here.
    pub async fn list_clients(&self) -> AppResult<Vec<ClientDetails>> {
        self.repository.users.list_clients().await
    }

    /// Get a single client
    pub async fn get_client(&self, id: i32) -> AppResult<ClientDetails> {
        self.repository.users.get_client(id).await
    }

    /// Create a new client with the Cliente role attached
    pub async fn create_client(&self, client: &CreateClient) -> AppResult<ClientSummary> {
        if self
            .repository
            .users
            .username_exists(&client.username, None)
            .await?
        {
            return Err(AppError::field("username", MSG_USERNAME_TAKEN));
        }

        let password_hash = hash_password(&client.password)?;
        let user = self.repository.users.create(client, &password_hash).await?;

        let role = self.repository.roles.get_or_create(ROL_CLIENTE).await?;
        self.repository.users.attach_role(user.id, role.id).await?;

        Ok(user.into())
    }

    /// Update a client. The password is re-hashed when supplied; role
    /// assignments are left untouched.
    pub async fn update_client(&self, id: i32, client: &UpdateClient) -> AppResult<ClientSummary> {
        // 404 before any field errors, and keeps admins out of reach
        self.repository.users.get_client(id).await?;

        if let Some(ref username) = client.username {
            if self
                .repository
                .users
                .username_exists(username, Some(id))
                .await?
            {
                return Err(AppError::field("username", MSG_USERNAME_TAKEN));
            }
        }

        let password_hash = match client.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };

        let user = self
            .repository
            .users
            .update(id, client, password_hash)
            .await?;

        Ok(user.into())
    }

    /// Delete a client
    pub async fn delete_client(&self, id: i32) -> AppResult<()> {
        self.repository.users.get_client(id).await?;
        self.repository.users.delete(id).await
    }
}
