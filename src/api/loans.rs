//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, LoanDetails, UpdateLoan},
    AppState,
};

use super::AuthenticatedUser;

/// List all loans
#[utoipa::path(
    get,
    path = "/prestamos/",
    tag = "prestamos",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "All loans", body = [LoanDetails]),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorDetail),
        (status = 403, description = "Administrator role required", body = crate::error::ErrorDetail)
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    current.require_administrador()?;

    let loans = state.services.loans.list_loans().await?;
    Ok(Json(loans))
}

/// Get loan details by ID
#[utoipa::path(
    get,
    path = "/prestamos/{id}/",
    tag = "prestamos",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    current.require_administrador()?;

    let loan = state.services.loans.get_loan(id).await?;
    Ok(Json(loan))
}

/// Create a new loan
#[utoipa::path(
    post,
    path = "/prestamos/",
    tag = "prestamos",
    security(("session_cookie" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanDetails),
        (status = 400, description = "Validation errors keyed by field", body = crate::error::FieldErrors)
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Json(payload): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<LoanDetails>)> {
    current.require_administrador()?;

    let loan = state.services.loans.create_loan(&payload).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Update a loan
#[utoipa::path(
    put,
    path = "/prestamos/{id}/",
    tag = "prestamos",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = LoanDetails),
        (status = 404, description = "Loan not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn update_loan(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLoan>,
) -> AppResult<Json<LoanDetails>> {
    current.require_administrador()?;

    let loan = state.services.loans.update_loan(id, &payload).await?;
    Ok(Json(loan))
}

/// Delete a loan
#[utoipa::path(
    delete,
    path = "/prestamos/{id}/",
    tag = "prestamos",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 204, description = "Loan deleted"),
        (status = 404, description = "Loan not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn delete_loan(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    current.require_administrador()?;

    state.services.loans.delete_loan(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a loan as returned
#[utoipa::path(
    post,
    path = "/prestamos/{id}/devolver/",
    tag = "prestamos",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Loan returned", body = LoanDetails),
        (status = 400, description = "Loan already returned", body = crate::error::ErrorDetail),
        (status = 404, description = "Loan not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    current.require_administrador()?;

    let loan = state.services.loans.return_loan(id).await?;
    Ok(Json(loan))
}
