//! Business logic services

pub mod auth;
pub mod catalog;
pub mod clients;
pub mod loans;
pub mod reservations;
pub mod roles;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub clients: clients::ClientsService,
    pub loans: loans::LoansService,
    pub reservations: reservations::ReservationsService,
    pub roles: roles::RolesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            clients: clients::ClientsService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            reservations: reservations::ReservationsService::new(repository.clone()),
            roles: roles::RolesService::new(repository),
        }
    }
}
