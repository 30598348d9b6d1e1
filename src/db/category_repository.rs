//! Category repository

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;

use super::{StoreError, StoreResult};
use crate::models::{Category, CreateCategoryRequest};
use crate::utils::validation;

pub struct CategoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Category>> {
        find(self.pool, id).await
    }

    /// Create a category; a duplicate name fails with `ConstraintViolation`
    pub async fn create(&self, req: &CreateCategoryRequest) -> StoreResult<Category> {
        validation::check(req)?;
        insert(self.pool, req).await
    }
}

pub(super) async fn find<'e, E>(executor: E, id: i64) -> StoreResult<Option<Category>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, description FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(category)
}

/// Insert an already validated category
pub(super) async fn insert<'e, E>(executor: E, req: &CreateCategoryRequest) -> StoreResult<Category>
where
    E: Executor<'e, Database = Sqlite>,
{
    let name = req.name.as_deref().unwrap_or_default();

    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, description)
        VALUES (?, ?)
        RETURNING id, name, description
        "#,
    )
    .bind(name)
    .bind(req.description.as_deref())
    .fetch_one(executor)
    .await
    .map_err(|e| StoreError::on_insert(e, "category", "name", name))?;

    info!(category_id = category.id, name = %category.name, "Created category");
    Ok(category)
}
