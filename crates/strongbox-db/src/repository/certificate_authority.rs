//! SurrealDB implementation of [`CertificateAuthorityRepository`].

use chrono::{DateTime, Utc};
use strongbox_core::error::StrongboxResult;
use strongbox_core::models::certificate::{
    CaType, CertificateAuthority, CreateCertificateAuthority,
};
use strongbox_core::repository::CertificateAuthorityRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CertificateAuthorityRow {
    name: String,
    ca_type: String,
    certificate: String,
    private_key: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CertificateAuthorityRowWithId {
    record_id: String,
    name: String,
    ca_type: String,
    certificate: String,
    private_key: String,
    created_at: DateTime<Utc>,
}

fn parse_ca_type(raw: &str) -> Result<CaType, DbError> {
    CaType::parse(raw).ok_or_else(|| DbError::Decode {
        entity: "certificate_authority".into(),
        reason: format!("unknown ca_type '{raw}'"),
    })
}

fn row_to_authority(
    row: CertificateAuthorityRow,
    id: Uuid,
) -> Result<CertificateAuthority, DbError> {
    Ok(CertificateAuthority {
        id,
        ca_type: parse_ca_type(&row.ca_type)?,
        name: row.name,
        certificate: row.certificate,
        private_key: row.private_key,
        created_at: row.created_at,
    })
}

impl CertificateAuthorityRowWithId {
    fn try_into_authority(self) -> Result<CertificateAuthority, DbError> {
        let id = Uuid::parse_str(&self.record_id).map_err(|e| DbError::Decode {
            entity: "certificate_authority".into(),
            reason: format!("invalid UUID: {e}"),
        })?;
        Ok(CertificateAuthority {
            id,
            ca_type: parse_ca_type(&self.ca_type)?,
            name: self.name,
            certificate: self.certificate,
            private_key: self.private_key,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the certificate authority repository.
#[derive(Clone)]
pub struct SurrealCertificateAuthorityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCertificateAuthorityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CertificateAuthorityRepository for SurrealCertificateAuthorityRepository<C> {
    async fn create(
        &self,
        input: CreateCertificateAuthority,
    ) -> StrongboxResult<CertificateAuthority> {
        let id = Uuid::now_v7();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('certificate_authority', $id) SET \
                 name = $name, \
                 ca_type = $ca_type, \
                 certificate = $certificate, \
                 private_key = $private_key",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("ca_type", input.ca_type.as_str()))
            .bind(("certificate", input.certificate))
            .bind(("private_key", input.private_key))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<CertificateAuthorityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "certificate_authority".into(),
            id: id_str,
        })?;

        row_to_authority(row, id).map_err(Into::into)
    }

    async fn find_most_recent(&self, name: &str) -> StrongboxResult<Option<CertificateAuthority>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM certificate_authority \
                 WHERE name = $name ORDER BY id DESC LIMIT 1",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CertificateAuthorityRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .next()
            .map(CertificateAuthorityRowWithId::try_into_authority)
            .transpose()
            .map_err(Into::into)
    }
}
