//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Secrets and CAs are versioned:
//! writes always insert a new version and reads resolve the most recent
//! one. Implementations must make a stored version visible atomically.

use crate::error::StrongboxResult;
use crate::models::{
    audit::{AuditOperation, CreateOperationAuditRecord, OperationAuditRecord},
    certificate::{CertificateAuthority, CreateCertificateAuthority},
    secret::{CreateSecret, StoredSecret},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

pub trait SecretRepository: Send + Sync {
    /// Store a new version under `input.name`.
    fn create(
        &self,
        input: CreateSecret,
    ) -> impl Future<Output = StrongboxResult<StoredSecret>> + Send;
    /// The latest version stored under `name`, if any.
    fn find_most_recent(
        &self,
        name: &str,
    ) -> impl Future<Output = StrongboxResult<Option<StoredSecret>>> + Send;
    /// Delete every version of `name`; returns how many were removed.
    fn delete_all(&self, name: &str) -> impl Future<Output = StrongboxResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Certificate authorities
// ---------------------------------------------------------------------------

pub trait CertificateAuthorityRepository: Send + Sync {
    /// Store a new CA version under `input.name`.
    fn create(
        &self,
        input: CreateCertificateAuthority,
    ) -> impl Future<Output = StrongboxResult<CertificateAuthority>> + Send;
    /// The most recently created CA version for `name`, if any.
    fn find_most_recent(
        &self,
        name: &str,
    ) -> impl Future<Output = StrongboxResult<Option<CertificateAuthority>>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only)
// ---------------------------------------------------------------------------

/// Query filters for audit records.
#[derive(Debug, Clone, Default)]
pub struct AuditRecordFilter {
    pub path: Option<String>,
    pub operation: Option<AuditOperation>,
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

pub trait AuditRecordRepository: Send + Sync {
    /// Append a new audit record. No update or delete operations exist.
    fn append(
        &self,
        input: CreateOperationAuditRecord,
    ) -> impl Future<Output = StrongboxResult<OperationAuditRecord>> + Send;
    /// Records in append order.
    fn list(
        &self,
        filter: AuditRecordFilter,
        pagination: Pagination,
    ) -> impl Future<Output = StrongboxResult<PaginatedResult<OperationAuditRecord>>> + Send;
}
