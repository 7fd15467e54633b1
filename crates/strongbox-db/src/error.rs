//! Persistence failures and their mapping onto [`StrongboxError`].

use strongbox_core::error::StrongboxError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("schema migration failed: {0}")]
    Migration(String),

    #[error("statement rejected: {0}")]
    Query(String),

    #[error("malformed {entity} row: {reason}")]
    Decode { entity: String, reason: String },

    #[error("{entity} {id} was not written")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for StrongboxError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => StrongboxError::NotFound { entity, id },
            other => StrongboxError::Database(other.to_string()),
        }
    }
}
