//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{BookDetails, BookQuery, CreateBook, UpdateBook},
};

/// Availability is derived per request: a book is Prestado while any loan
/// on it is Activo or Vencido.
const ESTADO_EXPR: &str = r#"
    CASE WHEN EXISTS (
        SELECT 1 FROM prestamos p
        WHERE p.libro_id = l.id AND p.estado IN ('Activo', 'Vencido')
    ) THEN 'Prestado' ELSE 'Disponible' END AS estado
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search the catalog. Empty parameters and the `Todas` category
    /// sentinel leave their filter off; active filters AND together.
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<BookDetails>> {
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref q) = query.q {
            if !q.is_empty() {
                params.push(format!("%{}%", q));
                conditions.push(format!("l.titulo ILIKE ${}", params.len()));
            }
        }

        if let Some(ref autor) = query.autor {
            if !autor.is_empty() {
                params.push(format!("%{}%", autor));
                conditions.push(format!("l.autor ILIKE ${}", params.len()));
            }
        }

        if let Some(ref categoria) = query.categoria {
            if !categoria.is_empty() && categoria != "Todas" {
                params.push(categoria.clone());
                conditions.push(format!("LOWER(l.categoria) = LOWER(${})", params.len()));
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_query = format!(
            r#"
            SELECT l.id, l.isbn, l.titulo, l.autor, l.categoria, {}
            FROM libros l
            {}
            ORDER BY l.id
            "#,
            ESTADO_EXPR, where_clause
        );

        let mut select_builder = sqlx::query_as::<_, BookDetails>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let books = select_builder.fetch_all(&self.pool).await?;

        Ok(books)
    }

    /// Get a book with its derived availability
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let query = format!(
            r#"
            SELECT l.id, l.isbn, l.titulo, l.autor, l.categoria, {}
            FROM libros l
            WHERE l.id = $1
            "#,
            ESTADO_EXPR
        );

        let book = sqlx::query_as::<_, BookDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No encontrado.".to_string()))?;

        Ok(book)
    }

    /// Check if an ISBN is already taken (exact match)
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM libros WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM libros WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Check that a book id exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM libros WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<BookDetails> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO libros (isbn, titulo, autor, categoria)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.titulo)
        .bind(&book.autor)
        .bind(&book.categoria)
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }

    /// Update an existing book
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<BookDetails> {
        // Build dynamic update query
        let mut sets: Vec<String> = Vec::new();
        let mut param_idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(book.isbn, "isbn");
        add_field!(book.titulo, "titulo");
        add_field!(book.autor, "autor");
        add_field!(book.categoria, "categoria");

        if sets.is_empty() {
            return self.get_details(id).await;
        }

        let query = format!("UPDATE libros SET {} WHERE id = {}", sets.join(", "), id);

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(book.isbn);
        bind_field!(book.titulo);
        bind_field!(book.autor);
        bind_field!(book.categoria);

        builder.execute(&self.pool).await?;

        self.get_details(id).await
    }

    /// Delete a book. Books referenced by prestamos are protected;
    /// reservas on the book cascade away.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let loans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prestamos WHERE libro_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if loans > 0 {
            return Err(AppError::Conflict(
                "No se puede eliminar: el libro tiene préstamos asociados.".to_string(),
            ));
        }

        sqlx::query("DELETE FROM libros WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
