//! Named, versioned secret domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of value held by a secret.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SecretType {
    Value,
    Password,
    Certificate,
}

impl SecretType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretType::Value => "value",
            SecretType::Password => "password",
            SecretType::Certificate => "certificate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "value" => Some(SecretType::Value),
            "password" => Some(SecretType::Password),
            "certificate" => Some(SecretType::Certificate),
            _ => None,
        }
    }
}

/// The material of one secret version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SecretValue {
    Value(String),
    Password(String),
    Certificate {
        /// PEM of the issuing CA, if any.
        ca: Option<String>,
        certificate: Option<String>,
        private_key: Option<String>,
    },
}

impl SecretValue {
    pub fn secret_type(&self) -> SecretType {
        match self {
            SecretValue::Value(_) => SecretType::Value,
            SecretValue::Password(_) => SecretType::Password,
            SecretValue::Certificate { .. } => SecretType::Certificate,
        }
    }
}

impl From<super::certificate::IssuedCertificate> for SecretValue {
    fn from(issued: super::certificate::IssuedCertificate) -> Self {
        SecretValue::Certificate {
            ca: issued.ca_certificate,
            certificate: Some(issued.public_key_certificate),
            private_key: Some(issued.private_key),
        }
    }
}

/// One stored version of a named secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSecret {
    /// Time-ordered (v7) identifier; later versions sort higher.
    pub id: Uuid,
    pub name: String,
    pub value: SecretValue,
    pub created_at: DateTime<Utc>,
}

/// Fields required to store a new secret version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSecret {
    pub name: String,
    pub value: SecretValue,
}
