//! Certificate domain models.
//!
//! Strongbox issues X.509 certificates either self-signed or signed by a
//! named certificate authority whose credential is stored as a versioned
//! secret.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StrongboxError, StrongboxResult};

/// RSA modulus sizes accepted for issued keys.
pub const VALID_KEY_LENGTHS: [u32; 3] = [2048, 3072, 4096];

pub const DEFAULT_KEY_LENGTH: u32 = 2048;

pub const DEFAULT_DURATION_DAYS: u32 = 365;

/// Longest accepted validity, 100 years.
pub const MAX_DURATION_DAYS: u32 = 36_500;

/// Subject and issuance options for a certificate.
///
/// Equality covers every field, including the order of
/// `alternative_names`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CertificateParameters {
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub common_name: Option<String>,
    pub locality: Option<String>,
    pub alternative_names: Vec<String>,
    pub key_length: u32,
    #[serde(rename = "duration")]
    pub duration_days: u32,
    /// Name of the CA that signs the certificate.
    #[serde(rename = "ca")]
    pub ca_name: Option<String>,
    pub self_sign: bool,
    /// Mark a self-signed certificate as a CA (basic constraints CA=true).
    #[serde(skip)]
    pub is_ca: bool,
}

impl Default for CertificateParameters {
    fn default() -> Self {
        Self {
            organization: None,
            organization_unit: None,
            state: None,
            country: None,
            common_name: None,
            locality: None,
            alternative_names: Vec::new(),
            key_length: DEFAULT_KEY_LENGTH,
            duration_days: DEFAULT_DURATION_DAYS,
            ca_name: None,
            self_sign: false,
            is_ca: false,
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

impl CertificateParameters {
    pub fn add_alternative_name(&mut self, name: impl Into<String>) {
        self.alternative_names.push(name.into());
    }

    /// Distinguished-name components in their fixed order:
    /// `O`, `ST`, `C`, `CN`, `OU`, `L`. Empty fields are skipped.
    pub fn dn_components(&self) -> Vec<(&'static str, &str)> {
        [
            ("O", &self.organization),
            ("ST", &self.state),
            ("C", &self.country),
            ("CN", &self.common_name),
            ("OU", &self.organization_unit),
            ("L", &self.locality),
        ]
        .into_iter()
        .filter_map(|(label, field)| non_empty(field).map(|value| (label, value)))
        .collect()
    }

    /// The subject DN, e.g. `O=My Organization,ST=My State,C=My Country`.
    pub fn dn_string(&self) -> String {
        self.dn_components()
            .into_iter()
            .map(|(label, value)| format!("{label}={value}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Check the subject fields, the key length and the validity period.
    ///
    /// Either organization, state and country are all present, or a
    /// common name is.
    pub fn validate(&self) -> StrongboxResult<()> {
        let has_organization = non_empty(&self.organization).is_some()
            && non_empty(&self.state).is_some()
            && non_empty(&self.country).is_some();
        if !has_organization && non_empty(&self.common_name).is_none() {
            return Err(StrongboxError::MissingCertificateParameters);
        }

        if !VALID_KEY_LENGTHS.contains(&self.key_length) {
            return Err(StrongboxError::InvalidKeyLength(self.key_length));
        }

        if self.duration_days > MAX_DURATION_DAYS {
            return Err(StrongboxError::validation("invalid_duration"));
        }

        Ok(())
    }
}

/// The kind of a stored CA credential.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaType {
    Root,
}

impl CaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaType::Root => "root",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "root" => Some(CaType::Root),
            _ => None,
        }
    }
}

/// One stored version of a named certificate authority.
///
/// Versions are never modified; a new version supersedes older ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CertificateAuthority {
    /// Time-ordered (v7) identifier; later versions sort higher.
    pub id: Uuid,
    pub name: String,
    pub ca_type: CaType,
    /// PEM-encoded public certificate.
    pub certificate: String,
    /// PEM-encoded private key.
    pub private_key: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to store a new CA version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCertificateAuthority {
    pub name: String,
    pub ca_type: CaType,
    pub certificate: String,
    pub private_key: String,
}

/// Output of certificate issuance. All material is PEM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuedCertificate {
    pub public_key_certificate: String,
    pub private_key: String,
    /// Certificate of the signing CA; `None` when self-signed.
    pub ca_certificate: Option<String>,
}
