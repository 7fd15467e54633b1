//! Key-pair generation.

use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;

use crate::error::PkiError;

/// Produces a fresh key pair of the requested modulus size.
pub trait KeyPairGenerator: Send + Sync {
    fn generate(&self, bits: u32) -> Result<PKey<Private>, PkiError>;
}

/// RSA keys from the OpenSSL backend. A new key is generated on every
/// call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaKeyPairGenerator;

impl KeyPairGenerator for RsaKeyPairGenerator {
    fn generate(&self, bits: u32) -> Result<PKey<Private>, PkiError> {
        let rsa = Rsa::generate(bits)
            .map_err(|e| PkiError::KeyGeneration(format!("RSA-{bits}: {e}")))?;
        Ok(PKey::from_rsa(rsa)?)
    }
}
