//! Biblioteca Server - Library Loan Management System

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblioteca_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "biblioteca_server={},tower_http=debug",
            config.logging.level
        )
        .into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Biblioteca Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // Create the bootstrap superuser when none exists yet
    services
        .auth
        .bootstrap_admin()
        .await
        .expect("Failed to bootstrap admin account");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes. Trailing slashes match the original surface.
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/login/", post(api::auth::login))
        .route("/registro/", post(api::auth::registro))
        .route("/csrf-token/", get(api::auth::csrf_token))
        // Libros (catalog reads are public, writes admin-only)
        .route("/libros/", get(api::books::list_books))
        .route("/libros/", post(api::books::create_book))
        .route("/libros/:id/", get(api::books::get_book))
        .route("/libros/:id/", put(api::books::update_book))
        .route("/libros/:id/", patch(api::books::update_book))
        .route("/libros/:id/", delete(api::books::delete_book))
        // Prestamos
        .route("/prestamos/", get(api::loans::list_loans))
        .route("/prestamos/", post(api::loans::create_loan))
        .route("/prestamos/:id/", get(api::loans::get_loan))
        .route("/prestamos/:id/", put(api::loans::update_loan))
        .route("/prestamos/:id/", patch(api::loans::update_loan))
        .route("/prestamos/:id/", delete(api::loans::delete_loan))
        .route("/prestamos/:id/devolver/", post(api::loans::return_loan))
        // Clientes
        .route("/clientes/", get(api::clients::list_clients))
        .route("/clientes/", post(api::clients::create_client))
        .route("/clientes/:id/", get(api::clients::get_client))
        .route("/clientes/:id/", put(api::clients::update_client))
        .route("/clientes/:id/", patch(api::clients::update_client))
        .route("/clientes/:id/", delete(api::clients::delete_client))
        // Reservas
        .route("/reservas/", get(api::reservations::list_reservations))
        .route("/reservas/", post(api::reservations::create_reservation))
        .route("/reservas/:id/", get(api::reservations::get_reservation))
        .route("/reservas/:id/", put(api::reservations::update_reservation))
        .route("/reservas/:id/", patch(api::reservations::update_reservation))
        .route("/reservas/:id/", delete(api::reservations::delete_reservation))
        // Roles
        .route("/roles/", get(api::roles::list_roles))
        .route("/roles/", post(api::roles::create_role))
        .route("/roles/:id/", get(api::roles::get_role))
        .route("/roles/:id/", put(api::roles::update_role))
        .route("/roles/:id/", patch(api::roles::update_role))
        .route("/roles/:id/", delete(api::roles::delete_role))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
