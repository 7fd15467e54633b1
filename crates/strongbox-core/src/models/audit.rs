//! Operation audit record domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalized name of an audited operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    CredentialUpdate,
    CredentialDelete,
    CredentialAccess,
    CaUpdate,
    CaAccess,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOperation::CredentialUpdate => "credential_update",
            AuditOperation::CredentialDelete => "credential_delete",
            AuditOperation::CredentialAccess => "credential_access",
            AuditOperation::CaUpdate => "ca_update",
            AuditOperation::CaAccess => "ca_access",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "credential_update" => Some(AuditOperation::CredentialUpdate),
            "credential_delete" => Some(AuditOperation::CredentialDelete),
            "credential_access" => Some(AuditOperation::CredentialAccess),
            "ca_update" => Some(AuditOperation::CaUpdate),
            "ca_access" => Some(AuditOperation::CaAccess),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditOutcome {
    Success,
    Failure,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "Success",
            AuditOutcome::Failure => "Failure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Success" => Some(AuditOutcome::Success),
            "Failure" => Some(AuditOutcome::Failure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationAuditRecord {
    pub id: Uuid,
    /// Resource path acted upon, e.g. `/api/v1/data/foo`.
    pub path: String,
    pub operation: AuditOperation,
    pub outcome: AuditOutcome,
    /// Error code when the operation failed.
    pub failure_code: Option<String>,
    /// Authenticated caller, when the transport supplied one.
    pub actor: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOperationAuditRecord {
    pub path: String,
    pub operation: AuditOperation,
    pub outcome: AuditOutcome,
    pub failure_code: Option<String>,
    pub actor: Option<String>,
    pub timestamp: DateTime<Utc>,
}
