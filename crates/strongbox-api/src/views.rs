//! Serializable response shapes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strongbox_core::models::certificate::{CaType, CertificateAuthority};
use strongbox_core::models::secret::{SecretType, SecretValue, StoredSecret};
use strongbox_pki::builder::summarize;

/// Facts read from a stored PEM certificate. Absent when the stored text
/// is not a parseable certificate.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CertificateInfo {
    pub subject: String,
    pub issuer: String,
    pub fingerprint: String,
    pub not_after: String,
}

impl CertificateInfo {
    fn from_pem(pem: Option<&str>) -> Option<Self> {
        let summary = summarize(pem?).ok()?;
        Some(Self {
            subject: summary.subject,
            issuer: summary.issuer,
            fingerprint: summary.fingerprint,
            not_after: summary.not_after,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CertificateBody {
    pub ca: Option<String>,
    pub certificate: Option<String>,
    pub private: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<CertificateInfo>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CredentialView {
    Text(String),
    Certificate(CertificateBody),
}

/// A secret version as returned to callers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SecretView {
    pub id: uuid::Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub secret_type: SecretType,
    pub credential: CredentialView,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredSecret> for SecretView {
    fn from(secret: StoredSecret) -> Self {
        let secret_type = secret.value.secret_type();
        let credential = match secret.value {
            SecretValue::Value(v) | SecretValue::Password(v) => CredentialView::Text(v),
            SecretValue::Certificate {
                ca,
                certificate,
                private_key,
            } => CredentialView::Certificate(CertificateBody {
                info: CertificateInfo::from_pem(certificate.as_deref()),
                ca,
                certificate,
                private: private_key,
            }),
        };
        Self {
            id: secret.id,
            name: secret.name,
            secret_type,
            credential,
            updated_at: secret.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CaBody {
    pub certificate: String,
    pub private: String,
}

/// A CA version as returned to callers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CertificateAuthorityView {
    pub id: uuid::Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub ca_type: CaType,
    pub ca: CaBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<CertificateInfo>,
    pub updated_at: DateTime<Utc>,
}

impl From<CertificateAuthority> for CertificateAuthorityView {
    fn from(ca: CertificateAuthority) -> Self {
        Self {
            info: CertificateInfo::from_pem(Some(&ca.certificate)),
            id: ca.id,
            name: ca.name,
            ca_type: ca.ca_type,
            ca: CaBody {
                certificate: ca.certificate,
                private: ca.private_key,
            },
            updated_at: ca.created_at,
        }
    }
}

/// Response of a delete: how many versions were removed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeletedView {
    pub name: String,
    pub versions: u64,
}

/// Successful result of a handled request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResponseBody {
    Secret(SecretView),
    CertificateAuthority(CertificateAuthorityView),
    Deleted(DeletedView),
}
