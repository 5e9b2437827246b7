//! Reservation management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::reservation::{CreateReservation, ReservationDetails, UpdateReservation},
    AppState,
};

use super::AuthenticatedUser;

/// List all reservations
#[utoipa::path(
    get,
    path = "/reservas/",
    tag = "reservas",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "All reservations", body = [ReservationDetails]),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorDetail),
        (status = 403, description = "Administrator role required", body = crate::error::ErrorDetail)
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> AppResult<Json<Vec<ReservationDetails>>> {
    current.require_administrador()?;

    let reservations = state.services.reservations.list_reservations().await?;
    Ok(Json(reservations))
}

/// Get reservation details by ID
#[utoipa::path(
    get,
    path = "/reservas/{id}/",
    tag = "reservas",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation details", body = ReservationDetails),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ReservationDetails>> {
    current.require_administrador()?;

    let reservation = state.services.reservations.get_reservation(id).await?;
    Ok(Json(reservation))
}

/// Create a new reservation
#[utoipa::path(
    post,
    path = "/reservas/",
    tag = "reservas",
    security(("session_cookie" = [])),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = ReservationDetails),
        (status = 400, description = "Validation errors keyed by field", body = crate::error::FieldErrors)
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Json(payload): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<ReservationDetails>)> {
    current.require_administrador()?;

    let reservation = state
        .services
        .reservations
        .create_reservation(&payload)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Update a reservation
#[utoipa::path(
    put,
    path = "/reservas/{id}/",
    tag = "reservas",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    request_body = UpdateReservation,
    responses(
        (status = 200, description = "Reservation updated", body = ReservationDetails),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn update_reservation(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReservation>,
) -> AppResult<Json<ReservationDetails>> {
    current.require_administrador()?;

    let reservation = state
        .services
        .reservations
        .update_reservation(id, &payload)
        .await?;
    Ok(Json(reservation))
}

/// Delete a reservation
#[utoipa::path(
    delete,
    path = "/reservas/{id}/",
    tag = "reservas",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 404, description = "Reservation not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    current.require_administrador()?;

    state.services.reservations.delete_reservation(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
