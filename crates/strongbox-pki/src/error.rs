//! PKI error types.

use openssl::error::ErrorStack;
use strongbox_core::error::StrongboxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PkiError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("validity period out of range: {0} days")]
    Validity(u32),

    #[error("invalid PEM material: {0}")]
    InvalidPem(String),

    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] ErrorStack),
}

impl From<PkiError> for StrongboxError {
    fn from(err: PkiError) -> Self {
        StrongboxError::Issuance(err.to_string())
    }
}
