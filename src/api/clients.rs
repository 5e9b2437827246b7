//! Client account management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{ClientDetails, ClientSummary, CreateClient, UpdateClient},
    AppState,
};

use super::AuthenticatedUser;

/// List client accounts
#[utoipa::path(
    get,
    path = "/clientes/",
    tag = "clientes",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "All client accounts", body = [ClientDetails]),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorDetail),
        (status = 403, description = "Administrator role required", body = crate::error::ErrorDetail)
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> AppResult<Json<Vec<ClientDetails>>> {
    current.require_administrador()?;

    let clients = state.services.clients.list_clients().await?;
    Ok(Json(clients))
}

/// Get client details by ID
#[utoipa::path(
    get,
    path = "/clientes/{id}/",
    tag = "clientes",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client details", body = ClientDetails),
        (status = 404, description = "Client not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn get_client(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ClientDetails>> {
    current.require_administrador()?;

    let client = state.services.clients.get_client(id).await?;
    Ok(Json(client))
}

/// Create a new client account
#[utoipa::path(
    post,
    path = "/clientes/",
    tag = "clientes",
    security(("session_cookie" = [])),
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created", body = ClientSummary),
        (status = 400, description = "Validation errors keyed by field", body = crate::error::FieldErrors)
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Json(payload): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<ClientSummary>)> {
    current.require_administrador()?;
    payload.validate()?;

    let client = state.services.clients.create_client(&payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Update a client account
#[utoipa::path(
    put,
    path = "/clientes/{id}/",
    tag = "clientes",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    request_body = UpdateClient,
    responses(
        (status = 200, description = "Client updated", body = ClientSummary),
        (status = 400, description = "Validation errors keyed by field", body = crate::error::FieldErrors),
        (status = 404, description = "Client not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClient>,
) -> AppResult<Json<ClientSummary>> {
    current.require_administrador()?;
    payload.validate()?;

    let client = state.services.clients.update_client(id, &payload).await?;
    Ok(Json(client))
}

/// Delete a client account
#[utoipa::path(
    delete,
    path = "/clientes/{id}/",
    tag = "clientes",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Client ID")
    ),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = crate::error::ErrorDetail),
        (status = 409, description = "Client has loans", body = crate::error::ErrorDetail)
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    current.require_administrador()?;

    state.services.clients.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
