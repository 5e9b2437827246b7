//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, clients, health, loans, reservations, roles};

/// Registers the session cookie as the API's security scheme
struct SessionCookieSecurity;

impl Modify for SessionCookieSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(super::SESSION_COOKIE))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "1.0.0",
        description = "Library loan management REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SessionCookieSecurity),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::registro,
        auth::csrf_token,
        // Libros
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Prestamos
        loans::list_loans,
        loans::get_loan,
        loans::create_loan,
        loans::update_loan,
        loans::delete_loan,
        loans::return_loan,
        // Clientes
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        // Reservas
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
        // Roles
        roles::list_roles,
        roles::get_role,
        roles::create_role,
        roles::update_role,
        roles::delete_role,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::RegisterResponse,
            // Libros
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Prestamos
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            crate::models::loan::UpdateLoan,
            // Clientes
            crate::models::user::ClientDetails,
            crate::models::user::ClientSummary,
            crate::models::user::CreateClient,
            crate::models::user::UpdateClient,
            // Reservas
            crate::models::reservation::ReservationDetails,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::UpdateReservation,
            // Roles
            crate::models::role::Role,
            crate::models::role::CreateRole,
            crate::models::role::UpdateRole,
            // Enums
            crate::models::enums::AccountStatus,
            crate::models::enums::Availability,
            crate::models::enums::LoanStatus,
            crate::models::enums::ReservationStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorDetail,
            crate::error::ErrorMessage,
            crate::error::FieldErrors,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, registration and CSRF"),
        (name = "libros", description = "Book catalog"),
        (name = "prestamos", description = "Loan management"),
        (name = "clientes", description = "Client account management"),
        (name = "reservas", description = "Reservation management"),
        (name = "roles", description = "Role management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
