//! Authentication service: login, registration and session handling

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateClient, CurrentUser, User, UserClaims, MSG_USERNAME_TAKEN},
    repository::Repository,
};

/// Role attached to every account created through registration
pub const ROL_CLIENTE: &str = "Cliente";

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password. The username lookup is exact
    /// and case-sensitive. A wrong password always answers before the
    /// active check, so deactivated accounts leak nothing on bad
    /// credentials. Returns the session token, the account and its roles.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<(String, User, Vec<String>)> {
        let user = match self.repository.users.get_by_username(username).await? {
            Some(user) => user,
            None => {
                tracing::warn!(username = %username, "Login failed: unknown username");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password(&user.password, password)? {
            tracing::warn!(username = %username, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            tracing::warn!(username = %username, "Login failed: inactive account");
            return Err(AppError::InactiveAccount);
        }

        self.repository.users.set_last_login(user.id).await?;

        let claims = UserClaims::new(&user, self.config.session_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        let roles = self.repository.users.get_role_names(user.id).await?;

        tracing::info!(username = %user.username, "Login successful");

        Ok((token, user, roles))
    }

    /// Register a new account and attach the Cliente role
    pub async fn register(&self, client: &CreateClient) -> AppResult<User> {
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

        tracing::info!(username = %user.username, "Account registered");

        Ok(user)
    }

    /// Resolve a session token into the account and its current roles.
    /// The roles come from the database on every call, so revoking a role
    /// takes effect immediately rather than at token expiry.
    pub async fn current_user(&self, token: &str) -> AppResult<CurrentUser> {
        let claims = UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Sesión inválida o expirada.".to_string()))?;

        let user = self
            .repository
            .users
            .get_by_id(claims.user_id)
            .await
            .map_err(|_| AppError::Authentication("Sesión inválida o expirada.".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication(
                "Sesión inválida o expirada.".to_string(),
            ));
        }

        let roles = self.repository.users.get_role_names(user.id).await?;

        Ok(CurrentUser { user, roles })
    }

    /// Create the `admin` superuser on first start, when a bootstrap
    /// password is configured and no superuser exists yet.
    pub async fn bootstrap_admin(&self) -> AppResult<()> {
        let Some(ref password) = self.config.admin_password else {
            return Ok(());
        };

        if self.repository.users.superuser_exists().await? {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        self.repository
            .users
            .create_superuser("admin", &password_hash)
            .await?;

        tracing::info!("Created bootstrap superuser 'admin'");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("claveSegura123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "claveSegura123").unwrap());
        assert!(!verify_password(&hash, "claveIncorrecta").unwrap());
    }

    #[test]
    fn same_password_hashes_to_different_strings() {
        let first = hash_password("clave").unwrap();
        let second = hash_password("clave").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        assert!(verify_password("no-es-un-hash", "clave").is_err());
    }
}
