//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{BookDetails, BookQuery, CreateBook, UpdateBook},
    AppState,
};

use super::AuthenticatedUser;

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/libros/",
    tag = "libros",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books with availability", body = [BookDetails])
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/libros/{id}/",
    tag = "libros",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/libros/",
    tag = "libros",
    security(("session_cookie" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDetails),
        (status = 400, description = "Validation errors keyed by field", body = crate::error::FieldErrors),
        (status = 403, description = "Administrator role required", body = crate::error::ErrorDetail)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Json(payload): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    current.require_administrador()?;
    payload.validate()?;

    let book = state.services.catalog.create_book(&payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/libros/{id}/",
    tag = "libros",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetails),
        (status = 404, description = "Book not found", body = crate::error::ErrorDetail)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBook>,
) -> AppResult<Json<BookDetails>> {
    current.require_administrador()?;
    payload.validate()?;

    let book = state.services.catalog.update_book(id, &payload).await?;
    Ok(Json(book))
}

/// Remove a book from the catalog
#[utoipa::path(
    delete,
    path = "/libros/{id}/",
    tag = "libros",
    security(("session_cookie" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorDetail),
        (status = 409, description = "Book has loans", body = crate::error::ErrorDetail)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    current.require_administrador()?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
