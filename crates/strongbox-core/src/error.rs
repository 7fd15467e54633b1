//! Error types for the Strongbox system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrongboxError {
    #[error("error.missing_certificate_parameters")]
    MissingCertificateParameters,

    #[error("error.invalid_key_length: {0}")]
    InvalidKeyLength(u32),

    #[error("error.invalid_json_key: {path}")]
    InvalidJsonKey { path: String },

    #[error("error.ca_not_found: {name}")]
    CaNotFound { name: String },

    /// Any other client-facing rule violation, identified by a stable code.
    #[error("error.{code}")]
    Validation { code: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Certificate issuance failed: {0}")]
    Issuance(String),

    #[error("Audit record could not be persisted: {0}")]
    AuditPersistence(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StrongboxError {
    pub fn validation(code: impl Into<String>) -> Self {
        Self::Validation { code: code.into() }
    }

    /// Whether the error is caused by the caller (4xx-equivalent) rather
    /// than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCertificateParameters
                | Self::InvalidKeyLength(_)
                | Self::InvalidJsonKey { .. }
                | Self::CaNotFound { .. }
                | Self::Validation { .. }
                | Self::NotFound { .. }
        )
    }

    /// Stable machine-readable error key.
    pub fn code(&self) -> String {
        match self {
            Self::MissingCertificateParameters => "error.missing_certificate_parameters".into(),
            Self::InvalidKeyLength(_) => "error.invalid_key_length".into(),
            Self::InvalidJsonKey { .. } => "error.invalid_json_key".into(),
            Self::CaNotFound { .. } => "error.ca_not_found".into(),
            Self::Validation { code } => format!("error.{code}"),
            Self::NotFound { .. } => "error.not_found".into(),
            Self::Issuance(_) => "error.issuance_failed".into(),
            Self::AuditPersistence(_) => "error.audit_save_failure".into(),
            Self::Database(_) | Self::Internal(_) => "error.internal".into(),
        }
    }

    /// The offending parameter (key path, CA name, entity id), if any.
    pub fn parameter(&self) -> Option<String> {
        match self {
            Self::InvalidKeyLength(len) => Some(len.to_string()),
            Self::InvalidJsonKey { path } => Some(path.clone()),
            Self::CaNotFound { name } => Some(name.clone()),
            Self::NotFound { id, .. } => Some(id.clone()),
            _ => None,
        }
    }
}

/// Structured error as shown to callers.
///
/// Server-side failures never leak their internal message; only the
/// stable code is exposed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl From<&StrongboxError> for ErrorBody {
    fn from(err: &StrongboxError) -> Self {
        Self {
            error: err.code(),
            parameter: if err.is_client_error() {
                err.parameter()
            } else {
                None
            },
        }
    }
}

pub type StrongboxResult<T> = Result<T, StrongboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_classified() {
        assert!(StrongboxError::MissingCertificateParameters.is_client_error());
        assert!(StrongboxError::InvalidKeyLength(1024).is_client_error());
        assert!(StrongboxError::validation("invalid_type").is_client_error());
        assert!(!StrongboxError::Issuance("boom".into()).is_client_error());
        assert!(!StrongboxError::AuditPersistence("down".into()).is_client_error());
    }

    #[test]
    fn error_body_names_the_offending_key() {
        let err = StrongboxError::InvalidJsonKey {
            path: "$['foo1']".into(),
        };
        let body = ErrorBody::from(&err);
        assert_eq!(body.error, "error.invalid_json_key");
        assert_eq!(body.parameter.as_deref(), Some("$['foo1']"));
    }

    #[test]
    fn error_body_hides_server_details() {
        let err = StrongboxError::Database("connection reset by peer".into());
        let body = ErrorBody::from(&err);
        assert_eq!(body.error, "error.internal");
        assert!(body.parameter.is_none());
    }
}
