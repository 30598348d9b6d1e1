//! Product repository
//!
//! Products are only ever read together with their organization and category,
//! in one joined query, so every `Product` leaving this module is a complete
//! aggregate of owned values.

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{category_repository, organization_repository, StoreError, StoreResult};
use crate::models::{Association, Category, CreateProductRequest, Organization, Product};

const SELECT_AGGREGATE: &str = r#"
    SELECT p.id AS id,
           p.name AS name,
           o.id AS organization_id,
           o.name AS organization_name,
           c.id AS category_id,
           c.name AS category_name,
           c.description AS category_description
    FROM products p
    INNER JOIN organizations o ON o.id = p.organization_id
    INNER JOIN categories c ON c.id = p.category_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    organization_id: i64,
    organization_name: String,
    category_id: i64,
    category_name: String,
    category_description: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            organization: Organization {
                id: row.organization_id,
                name: row.organization_name,
            },
            category: Category {
                id: row.category_id,
                name: row.category_name,
                description: row.category_description,
            },
        }
    }
}

/// An association after its reference, if any, has been looked up
enum Resolution<T, N> {
    Found(T),
    Insert(N),
}

pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All products with their organization and category loaded
    pub async fn list_with_associations(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_AGGREGATE} ORDER BY p.id"))
            .fetch_all(self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> StoreResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_AGGREGATE} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::from).ok_or(StoreError::NotFound {
            entity: "product",
            id,
        })
    }

    /// Products belonging to one category
    pub async fn list_by_category(&self, category_id: i64) -> StoreResult<Vec<Product>> {
        if category_repository::find(self.pool, category_id)
            .await?
            .is_none()
        {
            return Err(StoreError::NotFound {
                entity: "category",
                id: category_id,
            });
        }

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_AGGREGATE} WHERE p.category_id = ? ORDER BY p.id"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Create a product and, when embedded data is given, its organization
    /// and category, all in one transaction.
    ///
    /// Referenced ids are checked before anything is inserted. Dropping the
    /// transaction on any error rolls back whatever was written.
    ///
    /// The write lock is taken up front: a deferred transaction that reads
    /// first fails with `SQLITE_BUSY_SNAPSHOT` when another writer commits
    /// before its first insert.
    pub async fn create(&self, req: CreateProductRequest) -> StoreResult<Product> {
        let draft = req.into_draft()?;
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let organization = match draft.organization {
            Association::Existing(id) => Resolution::Found(
                organization_repository::find(&mut *tx, id)
                    .await?
                    .ok_or(StoreError::Reference {
                        entity: "organization",
                        id,
                    })?,
            ),
            Association::New(data) => Resolution::Insert(data),
        };

        let category = match draft.category {
            Association::Existing(id) => Resolution::Found(
                category_repository::find(&mut *tx, id)
                    .await?
                    .ok_or(StoreError::Reference {
                        entity: "category",
                        id,
                    })?,
            ),
            Association::New(data) => Resolution::Insert(data),
        };

        let organization = match organization {
            Resolution::Found(org) => org,
            Resolution::Insert(data) => organization_repository::insert(&mut *tx, &data).await?,
        };

        let category = match category {
            Resolution::Found(category) => category,
            Resolution::Insert(data) => category_repository::insert(&mut *tx, &data).await?,
        };

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (name, organization_id, category_id)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(organization.id)
        .bind(category.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            product_id = id,
            organization_id = organization.id,
            category_id = category.id,
            "Created product"
        );

        Ok(Product {
            id,
            name: draft.name,
            organization,
            category,
        })
    }
}
