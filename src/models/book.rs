//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::enums::Availability;

/// Book with its derived availability
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub isbn: String,
    pub titulo: String,
    pub autor: String,
    pub categoria: String,
    /// Prestado while any loan on the book is Activo or Vencido
    pub estado: Availability,
}

/// Catalog search parameters; filters compose conjunctively
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Substring of the title, case-insensitive
    pub q: Option<String>,
    /// Substring of the author, case-insensitive
    pub autor: Option<String>,
    /// Exact category, case-insensitive; `Todas` disables the filter
    pub categoria: Option<String>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(custom(function = crate::models::non_blank_max_20))]
    pub isbn: String,
    #[validate(custom(function = crate::models::non_blank_max_255))]
    pub titulo: String,
    #[validate(custom(function = crate::models::non_blank_max_100))]
    pub autor: String,
    #[validate(custom(function = crate::models::non_blank_max_50))]
    pub categoria: String,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(custom(function = crate::models::non_blank_max_20))]
    pub isbn: Option<String>,
    #[validate(custom(function = crate::models::non_blank_max_255))]
    pub titulo: Option<String>,
    #[validate(custom(function = crate::models::non_blank_max_100))]
    pub autor: Option<String>,
    #[validate(custom(function = crate::models::non_blank_max_50))]
    pub categoria: Option<String>,
}
