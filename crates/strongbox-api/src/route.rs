//! Mapping of verb and path onto an operation.

use std::fmt;

use serde::{Deserialize, Serialize};
use strongbox_core::error::{StrongboxError, StrongboxResult};
use strongbox_core::models::audit::AuditOperation;

pub const DATA_PREFIX: &str = "/api/v1/data/";
pub const CA_PREFIX: &str = "/api/v1/ca/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Case-insensitive parse of an HTTP method name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "PUT" => Some(Self::Put),
            "POST" => Some(Self::Post),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Secret,
    CertificateAuthority,
}

/// What a request asks for, once routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StoreSecret,
    GenerateSecret,
    GetSecret,
    DeleteSecret,
    StoreCa,
    GenerateCa,
    GetCa,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub action: Action,
    /// Secret or CA name: the path below the resource prefix.
    pub name: String,
}

impl Route {
    /// Route a request. Unknown prefixes, empty names and unsupported
    /// verb/resource pairs are rejected as not found.
    pub fn parse(verb: Verb, path: &str) -> StrongboxResult<Self> {
        let not_found = || StrongboxError::NotFound {
            entity: "route".into(),
            id: format!("{verb} {path}"),
        };

        let (kind, name) = if let Some(name) = path.strip_prefix(DATA_PREFIX) {
            (ResourceKind::Secret, name)
        } else if let Some(name) = path.strip_prefix(CA_PREFIX) {
            (ResourceKind::CertificateAuthority, name)
        } else {
            return Err(not_found());
        };
        if name.is_empty() {
            return Err(not_found());
        }

        let action = match (kind, verb) {
            (ResourceKind::Secret, Verb::Put) => Action::StoreSecret,
            (ResourceKind::Secret, Verb::Post) => Action::GenerateSecret,
            (ResourceKind::Secret, Verb::Get) => Action::GetSecret,
            (ResourceKind::Secret, Verb::Delete) => Action::DeleteSecret,
            (ResourceKind::CertificateAuthority, Verb::Put) => Action::StoreCa,
            (ResourceKind::CertificateAuthority, Verb::Post) => Action::GenerateCa,
            (ResourceKind::CertificateAuthority, Verb::Get) => Action::GetCa,
            (ResourceKind::CertificateAuthority, Verb::Delete) => return Err(not_found()),
        };

        Ok(Self {
            action,
            name: name.to_string(),
        })
    }

    pub fn kind(&self) -> ResourceKind {
        match self.action {
            Action::StoreCa | Action::GenerateCa | Action::GetCa => {
                ResourceKind::CertificateAuthority
            }
            _ => ResourceKind::Secret,
        }
    }

    /// The audit operation this route is recorded under. Store and
    /// generate are both updates.
    pub fn operation(&self) -> AuditOperation {
        match self.action {
            Action::StoreSecret | Action::GenerateSecret => AuditOperation::CredentialUpdate,
            Action::DeleteSecret => AuditOperation::CredentialDelete,
            Action::GetSecret => AuditOperation::CredentialAccess,
            Action::StoreCa | Action::GenerateCa => AuditOperation::CaUpdate,
            Action::GetCa => AuditOperation::CaAccess,
        }
    }
}
