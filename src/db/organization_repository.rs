//! Organization repository

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::info;

use super::{StoreError, StoreResult};
use crate::models::{CreateOrganizationRequest, Organization};
use crate::utils::validation;

pub struct OrganizationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrganizationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> StoreResult<Vec<Organization>> {
        let orgs = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name
            FROM organizations
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(orgs)
    }

    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Organization>> {
        find(self.pool, id).await
    }

    pub async fn create(&self, req: &CreateOrganizationRequest) -> StoreResult<Organization> {
        validation::check(req)?;
        insert(self.pool, req).await
    }
}

pub(super) async fn find<'e, E>(executor: E, id: i64) -> StoreResult<Option<Organization>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let org = sqlx::query_as::<_, Organization>("SELECT id, name FROM organizations WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(org)
}

/// Insert an already validated organization
pub(super) async fn insert<'e, E>(
    executor: E,
    req: &CreateOrganizationRequest,
) -> StoreResult<Organization>
where
    E: Executor<'e, Database = Sqlite>,
{
    let name = req.name.as_deref().unwrap_or_default();

    let org = sqlx::query_as::<_, Organization>(
        r#"
        INSERT INTO organizations (name)
        VALUES (?)
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_one(executor)
    .await
    .map_err(|e| StoreError::on_insert(e, "organization", "name", name))?;

    info!(organization_id = org.id, "Created organization");
    Ok(org)
}
