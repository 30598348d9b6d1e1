//! Store error kinds
//!
//! Every repository returns `StoreError`. The kinds travel unchanged up to the
//! REST and SOAP front ends, which are the only places that translate them
//! into protocol responses.

use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{entity} with {field} '{value}' already exists")]
    ConstraintViolation {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Referenced {entity} with id {id} does not exist")]
    Reference { entity: &'static str, id: i64 },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Classify a failed insert, turning unique violations on `field` into
    /// `ConstraintViolation`.
    pub(crate) fn on_insert(
        err: sqlx::Error,
        entity: &'static str,
        field: &'static str,
        value: &str,
    ) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::ConstraintViolation {
                    entity,
                    field,
                    value: value.to_string(),
                }
            }
            _ => StoreError::Database(err),
        }
    }

    /// Whether the caller, rather than the store, is at fault
    pub fn is_client_error(&self) -> bool {
        !matches!(self, StoreError::Database(_) | StoreError::Migration(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
