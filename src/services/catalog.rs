//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::book::{BookDetails, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

/// Wire message for a uniqueness violation on a field
const MSG_NOT_UNIQUE: &str = "Este campo debe ser único.";

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<BookDetails>> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, book: &CreateBook) -> AppResult<BookDetails> {
        if self.repository.books.isbn_exists(&book.isbn, None).await? {
            return Err(AppError::field("isbn", MSG_NOT_UNIQUE));
        }

        self.repository.books.create(book).await
    }

    /// Update an existing book
    pub async fn update_book(&self, id: i32, book: &UpdateBook) -> AppResult<BookDetails> {
        // 404 before any field errors
        self.repository.books.get_details(id).await?;

        if let Some(ref isbn) = book.isbn {
            if self.repository.books.isbn_exists(isbn, Some(id)).await? {
                return Err(AppError::field("isbn", MSG_NOT_UNIQUE));
            }
        }

        self.repository.books.update(id, book).await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.get_details(id).await?;
        self.repository.books.delete(id).await
    }
}
