//! Category model
//!
//! A category owns many products, but that side of the relation is only
//! reachable through `ProductRepository::list_by_category`. Keeping it out of
//! the struct means a category can never serialize its products.

use serde::{Deserialize, Serialize};

use crate::utils::validation::{FieldSpec, Schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::identity("id"),
        FieldSpec::text("name", true, 120),
        FieldSpec::text("description", false, 512),
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Schema for CreateCategoryRequest {
    const FIELDS: &'static [FieldSpec] = Category::FIELDS;

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            "description" => self.description.as_deref(),
            _ => None,
        }
    }
}
