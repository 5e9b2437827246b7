//! Role management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::role::{CreateRole, Role, UpdateRole},
    AppState,
};

use super::AuthenticatedUser;

/// List all roles
#[utoipa::path(
    get,
    path = "/roles/",
    tag = "roles",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "All roles", body = [Role]),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorDetail),
        (status = 403, description = "Administrator role required", body = crate::error::ErrorDetail)
    )
)]
pub async fn list_roles(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> AppResult<Json<Vec<Role>>> {
    current.require_administrador()?;

    let roles = state.services.roles.list_roles().await?;
    Ok(Json(roles))
}

/// Get role by ID
#[utoipa::path(
    get,
    path = "/roles/{id}/",
    tag = "roles",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role details", body = Role),
        (status = 404, description = "Role not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Role>> {
    current.require_administrador()?;

    let role = state.services.roles.get_role(id).await?;
    Ok(Json(role))
}

/// Create a new role
#[utoipa::path(
    post,
    path = "/roles/",
    tag = "roles",
    security(("session_cookie" = [])),
    request_body = CreateRole,
    responses(
        (status = 201, description = "Role created", body = Role),
        (status = 400, description = "Validation errors keyed by field", body = crate::error::FieldErrors)
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Json(payload): Json<CreateRole>,
) -> AppResult<(StatusCode, Json<Role>)> {
    current.require_administrador()?;
    payload.validate()?;

    let role = state.services.roles.create_role(&payload).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// Rename a role
#[utoipa::path(
    put,
    path = "/roles/{id}/",
    tag = "roles",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Role ID")
    ),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 404, description = "Role not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRole>,
) -> AppResult<Json<Role>> {
    current.require_administrador()?;
    payload.validate()?;

    let role = state.services.roles.update_role(id, &payload).await?;
    Ok(Json(role))
}

/// Delete a role
#[utoipa::path(
    delete,
    path = "/roles/{id}/",
    tag = "roles",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Role not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    current.require_administrador()?;

    state.services.roles.delete_role(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
