//! Role model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Role row from the roles table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: i32,
    pub nombre: String,
}

/// Create role request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRole {
    #[validate(custom(function = crate::models::non_blank_max_50))]
    pub nombre: String,
}

/// Update role request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRole {
    #[validate(custom(function = crate::models::non_blank_max_50))]
    pub nombre: Option<String>,
}
