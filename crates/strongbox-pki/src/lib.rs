//! Strongbox PKI: X.509 certificate issuance.
//!
//! Provides RSA key-pair generation, random serial numbers, self-signed
//! and CA-signed certificate building, and the [`CertificateGenerator`]
//! issuance engine that resolves signing CAs through a repository.

pub mod builder;
pub mod error;
pub mod generator;
pub mod keys;
pub mod serial;

pub use builder::CertificateBuilder;
pub use error::PkiError;
pub use generator::CertificateGenerator;
pub use keys::{KeyPairGenerator, RsaKeyPairGenerator};
pub use serial::{RandomSerialNumberGenerator, SerialNumberGenerator};
