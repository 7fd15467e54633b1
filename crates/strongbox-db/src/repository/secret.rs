//! SurrealDB implementation of [`SecretRepository`].

use chrono::{DateTime, Utc};
use strongbox_core::error::StrongboxResult;
use strongbox_core::models::secret::{CreateSecret, SecretType, SecretValue, StoredSecret};
use strongbox_core::repository::SecretRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;

/// Column layout of one secret version. Which optional columns are set
/// depends on `secret_type`.
#[derive(Debug, SurrealValue)]
struct SecretRow {
    name: String,
    secret_type: String,
    content: Option<String>,
    ca: Option<String>,
    certificate: Option<String>,
    private_key: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SecretRowWithId {
    record_id: String,
    name: String,
    secret_type: String,
    content: Option<String>,
    ca: Option<String>,
    certificate: Option<String>,
    private_key: Option<String>,
    created_at: DateTime<Utc>,
}

/// Flattened columns for a [`SecretValue`].
struct SecretColumns {
    secret_type: &'static str,
    content: Option<String>,
    ca: Option<String>,
    certificate: Option<String>,
    private_key: Option<String>,
}

impl From<SecretValue> for SecretColumns {
    fn from(value: SecretValue) -> Self {
        let secret_type = value.secret_type().as_str();
        match value {
            SecretValue::Value(v) | SecretValue::Password(v) => Self {
                secret_type,
                content: Some(v),
                ca: None,
                certificate: None,
                private_key: None,
            },
            SecretValue::Certificate {
                ca,
                certificate,
                private_key,
            } => Self {
                secret_type,
                content: None,
                ca,
                certificate,
                private_key,
            },
        }
    }
}

fn decode_value(row: &SecretRow) -> Result<SecretValue, DbError> {
    let decode_err = |reason: String| DbError::Decode {
        entity: "secret".into(),
        reason,
    };
    let secret_type = SecretType::parse(&row.secret_type)
        .ok_or_else(|| decode_err(format!("unknown secret_type '{}'", row.secret_type)))?;
    let scalar = || {
        row.content
            .clone()
            .ok_or_else(|| decode_err(format!("{} row without content", row.secret_type)))
    };
    Ok(match secret_type {
        SecretType::Value => SecretValue::Value(scalar()?),
        SecretType::Password => SecretValue::Password(scalar()?),
        SecretType::Certificate => SecretValue::Certificate {
            ca: row.ca.clone(),
            certificate: row.certificate.clone(),
            private_key: row.private_key.clone(),
        },
    })
}

fn row_to_secret(row: SecretRow, id: Uuid) -> Result<StoredSecret, DbError> {
    let value = decode_value(&row)?;
    Ok(StoredSecret {
        id,
        name: row.name,
        value,
        created_at: row.created_at,
    })
}

impl SecretRowWithId {
    fn try_into_secret(self) -> Result<StoredSecret, DbError> {
        let id = Uuid::parse_str(&self.record_id).map_err(|e| DbError::Decode {
            entity: "secret".into(),
            reason: format!("invalid UUID: {e}"),
        })?;
        let row = SecretRow {
            name: self.name,
            secret_type: self.secret_type,
            content: self.content,
            ca: self.ca,
            certificate: self.certificate,
            private_key: self.private_key,
            created_at: self.created_at,
        };
        row_to_secret(row, id)
    }
}

/// SurrealDB implementation of the secret repository.
#[derive(Clone)]
pub struct SurrealSecretRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSecretRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SecretRepository for SurrealSecretRepository<C> {
    async fn create(&self, input: CreateSecret) -> StrongboxResult<StoredSecret> {
        let id = Uuid::now_v7();
        let id_str = id.to_string();
        let columns = SecretColumns::from(input.value);

        let result = self
            .db
            .query(
                "CREATE type::record('secret', $id) SET \
                 name = $name, \
                 secret_type = $secret_type, \
                 content = $content, \
                 ca = $ca, \
                 certificate = $certificate, \
                 private_key = $private_key",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("secret_type", columns.secret_type))
            .bind(("content", columns.content))
            .bind(("ca", columns.ca))
            .bind(("certificate", columns.certificate))
            .bind(("private_key", columns.private_key))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<SecretRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "secret".into(),
            id: id_str,
        })?;

        debug!(name = %row.name, %id, "Stored secret version");
        row_to_secret(row, id).map_err(Into::into)
    }

    async fn find_most_recent(&self, name: &str) -> StrongboxResult<Option<StoredSecret>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM secret \
                 WHERE name = $name ORDER BY id DESC LIMIT 1",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SecretRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(SecretRowWithId::try_into_secret)
            .transpose()
            .map_err(Into::into)
    }

    async fn delete_all(&self, name: &str) -> StrongboxResult<u64> {
        let result = self
            .db
            .query("DELETE secret WHERE name = $name RETURN BEFORE")
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let removed: Vec<SecretRow> = result.take(0).map_err(DbError::from)?;
        debug!(name, removed = removed.len(), "Deleted secret versions");
        Ok(removed.len() as u64)
    }
}
